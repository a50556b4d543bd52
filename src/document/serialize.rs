// src/document/serialize.rs - Deterministic markup writer
//
// Element and text output goes through html5ever's serializer, which owns
// the escaping rules for text and attribute values.

use super::{Block, BlockKind, Mark, MarkKind, Run, TextBlock};
use crate::extension::ExtensionRegistry;
use html5ever::serialize::{HtmlSerializer, SerializeOpts, Serializer};
use html5ever::{LocalName, QualName, namespace_url, ns};
use log::warn;
use std::io;

type Writer = HtmlSerializer<Vec<u8>>;

pub(super) fn serialize_blocks(blocks: &[Block], registry: &ExtensionRegistry) -> String {
    let mut ser = HtmlSerializer::new(Vec::new(), SerializeOpts::default());
    if let Err(err) = write_blocks(blocks, registry, &mut ser) {
        warn!("markup serialization stopped early: {}", err);
    }
    String::from_utf8_lossy(&ser.writer).into_owned()
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

fn open(ser: &mut Writer, tag: &str, style: Option<&str>) -> io::Result<()> {
    let style_name = QualName::new(None, ns!(), LocalName::from("style"));
    let attrs = style.map(|value| (&style_name, value));
    ser.start_elem(html_name(tag), attrs.into_iter())
}

fn close(ser: &mut Writer, tag: &str) -> io::Result<()> {
    ser.end_elem(html_name(tag))
}

fn write_blocks(blocks: &[Block], registry: &ExtensionRegistry, ser: &mut Writer) -> io::Result<()> {
    for block in blocks {
        match block {
            Block::Text(text) => write_text_block(text, registry, ser)?,
            Block::BulletList(items) => {
                open(ser, "ul", None)?;
                for item in items {
                    open(ser, "li", None)?;
                    write_blocks(&item.blocks, registry, ser)?;
                    close(ser, "li")?;
                }
                close(ser, "ul")?;
            }
        }
    }
    Ok(())
}

fn write_text_block(block: &TextBlock, registry: &ExtensionRegistry, ser: &mut Writer) -> io::Result<()> {
    let tag = match block.kind {
        BlockKind::Paragraph => "p".to_string(),
        BlockKind::Heading(level) => format!("h{}", level.get()),
    };
    open(ser, &tag, None)?;
    write_inline(&block.runs, registry, ser)?;
    close(ser, &tag)
}

/// Marks shared with the previous run stay open, so `a` bold followed by
/// `b` bold+italic renders as `<strong>a<em>b</em></strong>`.
fn write_inline(runs: &[Run], registry: &ExtensionRegistry, ser: &mut Writer) -> io::Result<()> {
    let mut held: Vec<&Mark> = Vec::new();
    for run in runs {
        let marks = run.marks.as_slice();
        let keep = held
            .iter()
            .zip(marks)
            .take_while(|(held, mark)| **held == *mark)
            .count();
        while held.len() > keep {
            if let Some(mark) = held.pop() {
                close_mark(mark, registry, ser)?;
            }
        }
        for mark in &marks[keep..] {
            open_mark(mark, registry, ser)?;
            held.push(mark);
        }
        ser.write_text(&run.text)?;
    }
    while let Some(mark) = held.pop() {
        close_mark(mark, registry, ser)?;
    }
    Ok(())
}

/// Element name and optional style for a mark; `None` when the mark
/// renders to nothing.
fn mark_element(mark: &Mark, registry: &ExtensionRegistry) -> Option<(&'static str, Option<String>)> {
    match mark.kind {
        MarkKind::Bold => Some(("strong", None)),
        MarkKind::Italic => Some(("em", None)),
        MarkKind::TextStyle => registry
            .render_style(mark.kind, &mark.attrs)
            .map(|style| ("span", Some(style))),
    }
}

fn open_mark(mark: &Mark, registry: &ExtensionRegistry, ser: &mut Writer) -> io::Result<()> {
    match mark_element(mark, registry) {
        Some((tag, style)) => open(ser, tag, style.as_deref()),
        None => Ok(()),
    }
}

fn close_mark(mark: &Mark, registry: &ExtensionRegistry, ser: &mut Writer) -> io::Result<()> {
    match mark_element(mark, registry) {
        Some((tag, _)) => close(ser, tag),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Document, HeadingLevel, ListItem, MarkSet};
    use super::*;

    fn doc(blocks: Vec<Block>) -> Document {
        Document::from_blocks(blocks)
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Document::new().serialize(), "<p></p>");
    }

    #[test]
    fn test_shared_outer_marks_stay_open() {
        let bold = MarkSet::new().with(Mark::bold());
        let d = doc(vec![Block::Text(TextBlock::paragraph(vec![
            Run::new("a", bold.clone()),
            Run::new("b", bold.with(Mark::italic())),
            Run::plain("c"),
        ]))]);
        assert_eq!(d.serialize(), "<p><strong>a<em>b</em></strong>c</p>");
    }

    #[test]
    fn test_text_style_renders_span() {
        let style = Mark::text_style()
            .with_attr("fontSize", "20px")
            .with_attr("fontFamily", "Arial, sans-serif");
        let d = doc(vec![Block::Text(TextBlock::paragraph(vec![Run::new(
            "x",
            MarkSet::new().with(Mark::italic()).with(style),
        )]))]);
        assert_eq!(
            d.serialize(),
            "<p><em><span style=\"font-size: 20px; font-family: Arial, sans-serif\">x</span></em></p>"
        );
    }

    #[test]
    fn test_headings_and_lists() {
        let level = HeadingLevel::new(3).unwrap();
        let d = doc(vec![
            Block::Text(TextBlock::heading(level, vec![Run::plain("Title")])),
            Block::BulletList(vec![ListItem {
                blocks: vec![Block::Text(TextBlock::paragraph(vec![Run::plain("item")]))],
            }]),
        ]);
        assert_eq!(d.serialize(), "<h3>Title</h3><ul><li><p>item</p></li></ul>");
    }

    #[test]
    fn test_escaping() {
        let d = doc(vec![Block::Text(TextBlock::paragraph(vec![Run::plain(
            "a<b> & \u{a0}\"q\"",
        )]))]);
        assert_eq!(d.serialize(), "<p>a&lt;b&gt; &amp; &nbsp;\"q\"</p>");
        assert_eq!(Document::parse(&d.serialize()), d);
    }

    #[test]
    fn test_style_attribute_is_escaped() {
        let style = Mark::text_style().with_attr("fontFamily", "A&B \"Sans\"");
        let d = doc(vec![Block::Text(TextBlock::paragraph(vec![Run::new(
            "x",
            MarkSet::new().with(style),
        )]))]);
        assert_eq!(
            d.serialize(),
            "<p><span style=\"font-family: A&amp;B Sans\">x</span></p>"
        );
    }

    #[test]
    fn test_entity_text_round_trips_without_double_escaping() {
        let d = Document::parse("<p>caf&eacute; &mdash; done&hellip;</p>");
        assert_eq!(d.text(), "café — done…");
        assert_eq!(d.serialize(), "<p>café — done…</p>");
    }
}
