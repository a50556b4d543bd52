// src/commands/marks.rs - Inline mark commands

use crate::document::{Document, Mark, MarkKind, MarkSet};
use crate::extension::ExtensionRegistry;
use crate::selection::Selection;
use crate::state::EditorState;

/// Toggle a plain mark over the selection. If every selected run already
/// carries it the mark is removed everywhere; otherwise it is added
/// everywhere. A selection without text toggles the stored marks instead.
pub fn toggle_mark(state: &EditorState, kind: MarkKind) -> EditorState {
    let runs = state.selected_runs();
    if runs.is_empty() {
        let marks = state.cursor_marks();
        let marks = if marks.contains(kind) {
            marks.without(kind)
        } else {
            marks.with(Mark::new(kind))
        };
        return with_stored_marks(state, marks);
    }

    let remove = runs.iter().all(|run| run.marks.contains(kind));
    let doc = map_selected_marks(&state.doc, &state.selection, |marks| {
        if remove {
            marks.clone().without(kind)
        } else {
            marks.clone().with(Mark::new(kind))
        }
    });
    EditorState {
        doc,
        selection: state.selection,
        stored_marks: None,
    }
}

/// Assign a `textStyle` attribute over the selection regardless of what
/// was there; `None` clears it. The value is stored in canonical form.
pub fn set_text_style_attr(state: &EditorState, name: &str, value: Option<&str>) -> EditorState {
    let value = value.and_then(|v| ExtensionRegistry::global().canonical(MarkKind::TextStyle, name, v));
    let value = value.as_deref();
    if state.selected_runs().is_empty() {
        let mut marks = state.cursor_marks();
        marks.set_attr(name, value);
        return with_stored_marks(state, marks);
    }

    let doc = map_selected_marks(&state.doc, &state.selection, |marks| {
        let mut marks = marks.clone();
        marks.set_attr(name, value);
        marks
    });
    EditorState {
        doc,
        selection: state.selection,
        stored_marks: None,
    }
}

fn with_stored_marks(state: &EditorState, marks: MarkSet) -> EditorState {
    EditorState {
        doc: state.doc.clone(),
        selection: state.selection,
        stored_marks: Some(marks),
    }
}

fn map_selected_marks(doc: &Document, selection: &Selection, f: impl Fn(&MarkSet) -> MarkSet) -> Document {
    doc.apply_transform(|doc| {
        doc.edit_flat(|flat| {
            for idx in selection.blocks() {
                if let Some(entry) = flat.get_mut(idx) {
                    let range = selection.range_in(idx, entry.block.len());
                    entry.block.map_marks(range, &f);
                }
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Position;

    fn state(html: &str, selection: Selection) -> EditorState {
        let mut state = EditorState::parse(html);
        state.selection = selection;
        state
    }

    fn span(from: (usize, usize), to: (usize, usize)) -> Selection {
        Selection::new(Position::new(from.0, from.1), Position::new(to.0, to.1))
    }

    #[test]
    fn test_toggle_adds_when_any_run_lacks_mark() {
        let s = state("<p><strong>ab</strong>cd</p>", span((0, 0), (0, 4)));
        let next = toggle_mark(&s, MarkKind::Bold);
        assert_eq!(next.doc.serialize(), "<p><strong>abcd</strong></p>");

        let again = toggle_mark(&next, MarkKind::Bold);
        assert_eq!(again.doc.serialize(), "<p>abcd</p>");
    }

    #[test]
    fn test_toggle_only_touches_selection() {
        let s = state("<p>Hello World</p>", span((0, 6), (0, 11)));
        let next = toggle_mark(&s, MarkKind::Italic);
        assert_eq!(next.doc.serialize(), "<p>Hello <em>World</em></p>");
        assert_eq!(next.selection, s.selection);
    }

    #[test]
    fn test_toggle_across_blocks() {
        let s = state("<p>ab</p><ul><li><p>cd</p></li></ul>", span((0, 1), (1, 1)));
        let next = toggle_mark(&s, MarkKind::Bold);
        assert_eq!(
            next.doc.serialize(),
            "<p>a<strong>b</strong></p><ul><li><p><strong>c</strong>d</p></li></ul>"
        );
    }

    #[test]
    fn test_collapsed_toggle_only_stores_marks() {
        let s = state("<p>abc</p>", Selection::cursor(Position::new(0, 3)));
        let next = toggle_mark(&s, MarkKind::Bold);
        assert_eq!(next.doc, s.doc);
        assert!(next.stored_marks.as_ref().is_some_and(|m| m.contains(MarkKind::Bold)));

        let off = toggle_mark(&next, MarkKind::Bold);
        assert!(off.stored_marks.as_ref().is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn test_set_attr_is_absolute() {
        let s = state(
            "<p><span style=\"font-size: 12px\">ab</span>cd</p>",
            span((0, 0), (0, 4)),
        );
        let next = set_text_style_attr(&s, "fontSize", Some("20px"));
        assert_eq!(
            next.doc.serialize(),
            "<p><span style=\"font-size: 20px\">abcd</span></p>"
        );

        let cleared = set_text_style_attr(&next, "fontSize", None);
        assert_eq!(cleared.doc.serialize(), "<p>abcd</p>");
    }

    #[test]
    fn test_set_attr_keeps_other_attributes() {
        let s = state(
            "<p><span style=\"font-family: Georgia, serif\">ab</span></p>",
            span((0, 0), (0, 2)),
        );
        let next = set_text_style_attr(&s, "fontSize", Some("24px"));
        assert_eq!(
            next.doc.serialize(),
            "<p><span style=\"font-size: 24px; font-family: Georgia, serif\">ab</span></p>"
        );
    }

    #[test]
    fn test_quoted_font_family_is_stored_canonically() {
        let s = state("<p>ABC</p>", span((0, 0), (0, 3)));
        let next = set_text_style_attr(&s, "fontFamily", Some("'Times New Roman', serif"));
        let html = next.doc.serialize();
        assert_eq!(
            html,
            "<p><span style=\"font-family: Times New Roman, serif\">ABC</span></p>"
        );
        assert_eq!(Document::parse(&html), next.doc);

        let collapsed = state("<p>ABC</p>", Selection::cursor(Position::new(0, 3)));
        let stored = set_text_style_attr(&collapsed, "fontSize", Some("20px;"));
        assert_eq!(
            stored.stored_marks.as_ref().and_then(|m| m.attr("fontSize")),
            Some("20px")
        );
    }
}
