// src/document/parse.rs - Lenient markup reader
//
// html5ever builds the element tree, browser-style, from any fragment; the
// reader below maps that tree onto the document schema. Never fails:
// unknown elements are dropped with their text kept.

use super::run::MarkKind;
use super::{Block, HeadingLevel, ListItem, Mark, MarkSet, Run, TextBlock};
use crate::extension::{ExtensionRegistry, StyleDeclarations};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, local_name, namespace_url, ns, parse_fragment};
use log::{debug, trace};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose content is read as a sequence of blocks.
const BLOCK_CONTAINERS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer", "header", "html", "li", "main",
    "ol", "section", "table", "tbody", "td", "th", "thead", "tfoot", "tr",
];

/// Unsupported block elements that still form a paragraph of their own.
const PARAGRAPH_LIKE: &[&str] = &["h5", "h6", "pre", "address", "figcaption"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element {
        name: String,
        style: Option<String>,
        children: Vec<Node>,
    },
    Text(String),
}

pub(super) fn parse_blocks(html: &str, registry: &ExtensionRegistry) -> Vec<Block> {
    let nodes = parse_nodes(html);
    BlockReader { registry }.read_blocks(&nodes)
}

/// Parse `html` as the content of a `<body>` element.
fn parse_nodes(html: &str) -> Vec<Node> {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(html);
    for error in &dom.errors {
        trace!("markup parse error: {}", error);
    }

    // Fragment content sits under a synthetic <html> root.
    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name, .. } if name.local == local_name!("html")))
        .cloned();
    let children = match root {
        Some(root) => root.children.borrow().clone(),
        None => dom.document.children.borrow().clone(),
    };
    children.iter().filter_map(convert_node).collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let style = attrs
                .borrow()
                .iter()
                .find(|attr| attr.name.local == local_name!("style"))
                .map(|attr| attr.value.to_string());
            let children = handle
                .children
                .borrow()
                .iter()
                .filter_map(convert_node)
                .collect();
            Some(Node::Element {
                name: name.local.to_string(),
                style,
                children,
            })
        }
        _ => None,
    }
}

/// Maps the element tree onto the document schema.
struct BlockReader<'a> {
    registry: &'a ExtensionRegistry,
}

impl BlockReader<'_> {
    fn read_blocks(&self, nodes: &[Node]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pending: Vec<&Node> = Vec::new();

        for node in nodes {
            let (name, children) = match node {
                Node::Text(text) => {
                    if !(pending.is_empty() && text.trim().is_empty()) {
                        pending.push(node);
                    }
                    continue;
                }
                Node::Element { name, children, .. } => (name.as_str(), children),
            };

            match name {
                "p" => {
                    self.flush_pending(&mut pending, &mut blocks);
                    blocks.push(Block::Text(TextBlock::paragraph(self.read_inline(children))));
                }
                "h1" | "h2" | "h3" | "h4" => {
                    self.flush_pending(&mut pending, &mut blocks);
                    let level = name[1..]
                        .parse()
                        .ok()
                        .and_then(HeadingLevel::new)
                        .unwrap_or(HeadingLevel(HeadingLevel::MIN));
                    blocks.push(Block::Text(TextBlock::heading(
                        level,
                        self.read_inline(children),
                    )));
                }
                "ul" => {
                    self.flush_pending(&mut pending, &mut blocks);
                    blocks.push(Block::BulletList(self.read_items(children)));
                }
                _ if PARAGRAPH_LIKE.contains(&name) => {
                    debug!("reading unsupported <{}> as a paragraph", name);
                    self.flush_pending(&mut pending, &mut blocks);
                    blocks.push(Block::Text(TextBlock::paragraph(self.read_inline(children))));
                }
                _ if BLOCK_CONTAINERS.contains(&name) => {
                    if name != "div" && name != "body" && name != "html" {
                        debug!("dropping unsupported container <{}>", name);
                    }
                    self.flush_pending(&mut pending, &mut blocks);
                    blocks.extend(self.read_blocks(children));
                }
                _ => pending.push(node),
            }
        }
        self.flush_pending(&mut pending, &mut blocks);
        blocks
    }

    fn read_items(&self, nodes: &[Node]) -> Vec<ListItem> {
        nodes
            .iter()
            .filter_map(|node| {
                let blocks = match node {
                    Node::Element { name, children, .. } if name == "li" => {
                        self.read_blocks(children)
                    }
                    Node::Text(text) if text.trim().is_empty() => return None,
                    other => {
                        let blocks = self.read_blocks(std::slice::from_ref(other));
                        if blocks.is_empty() {
                            return None;
                        }
                        blocks
                    }
                };
                let blocks = if blocks.is_empty() {
                    vec![Block::Text(TextBlock::default())]
                } else {
                    blocks
                };
                Some(ListItem { blocks })
            })
            .collect()
    }

    /// Inline content found directly in a block container becomes an
    /// implicit paragraph; trailing whitespace-only text is dropped.
    fn flush_pending(&self, pending: &mut Vec<&Node>, blocks: &mut Vec<Block>) {
        while pending
            .last()
            .is_some_and(|n| matches!(n, Node::Text(t) if t.trim().is_empty()))
        {
            pending.pop();
        }
        if pending.is_empty() {
            return;
        }
        let mut runs = Vec::new();
        for node in pending.drain(..) {
            self.collect_inline(node, &MarkSet::new(), &mut runs);
        }
        blocks.push(Block::Text(TextBlock::paragraph(runs)));
    }

    fn read_inline(&self, nodes: &[Node]) -> Vec<Run> {
        let mut runs = Vec::new();
        for node in nodes {
            self.collect_inline(node, &MarkSet::new(), &mut runs);
        }
        runs
    }

    fn collect_inline(&self, node: &Node, marks: &MarkSet, out: &mut Vec<Run>) {
        let (name, style, children) = match node {
            Node::Text(text) => {
                out.push(Run::new(text.as_str(), marks.clone()));
                return;
            }
            Node::Element {
                name,
                style,
                children,
            } => (name.as_str(), style, children),
        };

        let marks = match name {
            "strong" | "b" => marks.clone().with(Mark::bold()),
            "em" | "i" => marks.clone().with(Mark::italic()),
            "span" => self.with_text_style(marks, style.as_deref()),
            _ => {
                debug!("dropping unsupported element <{}>, keeping its text", name);
                marks.clone()
            }
        };
        for child in children {
            self.collect_inline(child, &marks, out);
        }
    }

    fn with_text_style(&self, marks: &MarkSet, style: Option<&str>) -> MarkSet {
        let parsed = self.registry.parse_style(
            MarkKind::TextStyle,
            &StyleDeclarations::parse(style.unwrap_or_default()),
        );
        if parsed.is_empty() {
            return marks.clone();
        }
        let mut mark = marks
            .get(MarkKind::TextStyle)
            .cloned()
            .unwrap_or_else(Mark::text_style);
        mark.attrs.extend(parsed);
        marks.clone().with(mark)
    }
}
