// src/document/mod.rs - Structured rich-text document model
//
// A document is a tree of blocks. Leaf text blocks are addressed by their
// index in document order, which is what selections refer to. Structural
// edits work on the flattened form (`FlatBlock`) and are rebuilt into a
// tree, which is also how the tree is normalized.

mod parse;
mod run;
mod serialize;

pub use run::{Mark, MarkKind, MarkSet, Run};

use crate::extension::ExtensionRegistry;
use run::{normalize_runs, split_runs};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = HeadingLevel> {
        (Self::MIN..=Self::MAX).map(HeadingLevel)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading(HeadingLevel),
}

/// A block holding inline runs directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub runs: Vec<Run>,
}

impl TextBlock {
    pub fn new(kind: BlockKind, runs: Vec<Run>) -> Self {
        Self { kind, runs }
    }

    pub fn paragraph(runs: Vec<Run>) -> Self {
        Self::new(BlockKind::Paragraph, runs)
    }

    pub fn heading(level: HeadingLevel, runs: Vec<Run>) -> Self {
        Self::new(BlockKind::Heading(level), runs)
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Marks in effect at a cursor: those of the char before it, or of the
    /// first char when the cursor sits at the block start.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.char_len();
            if len == 0 {
                continue;
            }
            if offset == 0 || offset <= pos + len {
                return run.marks.clone();
            }
            pos += len;
        }
        MarkSet::new()
    }

    /// Runs with a non-empty overlap with `range`.
    pub fn runs_in(&self, range: Range<usize>) -> Vec<&Run> {
        let mut pos = 0;
        let mut out = Vec::new();
        for run in &self.runs {
            let len = run.char_len();
            let start = pos.max(range.start);
            let end = (pos + len).min(range.end);
            if start < end {
                out.push(run);
            }
            pos += len;
        }
        out
    }

    /// Rewrite the marks of the text inside `range`, splitting runs at the
    /// range edges. Callers normalize afterwards.
    pub fn map_marks(&mut self, range: Range<usize>, f: impl Fn(&MarkSet) -> MarkSet) {
        let (before, rest) = split_runs(&self.runs, range.start);
        let (inside, after) = split_runs(&rest, range.end.saturating_sub(range.start));
        let inside = inside
            .into_iter()
            .map(|run| Run::new(run.text, f(&run.marks)));
        self.runs = before.into_iter().chain(inside).chain(after).collect();
    }

    pub fn insert(&mut self, offset: usize, text: &str, marks: MarkSet) {
        let (before, after) = split_runs(&self.runs, offset);
        self.runs = before
            .into_iter()
            .chain(std::iter::once(Run::new(text, marks)))
            .chain(after)
            .collect();
    }

    pub fn remove(&mut self, range: Range<usize>) {
        let (before, rest) = split_runs(&self.runs, range.start);
        let (_, after) = split_runs(&rest, range.end.saturating_sub(range.start));
        self.runs = before.into_iter().chain(after).collect();
    }

    /// Truncate at `offset`, returning the runs that followed it.
    pub fn split_off(&mut self, offset: usize) -> Vec<Run> {
        let (before, after) = split_runs(&self.runs, offset);
        self.runs = before;
        after
    }

    fn normalize(&mut self, registry: &ExtensionRegistry) {
        self.runs = normalize_runs(std::mem::take(&mut self.runs), registry);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(TextBlock),
    BulletList(Vec<ListItem>),
}

/// A text block with its list context: `depth` is the number of enclosing
/// bullet lists, `starts_item` marks the first block of a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatBlock {
    pub block: TextBlock,
    pub depth: usize,
    pub starts_item: bool,
}

impl FlatBlock {
    pub fn top_level(block: TextBlock) -> Self {
        Self {
            block,
            depth: 0,
            starts_item: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding a single empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::Text(TextBlock::default())],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    pub fn from_flat(flat: Vec<FlatBlock>) -> Self {
        let mut doc = Self {
            blocks: build_blocks(&clamp_depths(flat), &mut 0, 0),
        };
        doc.normalize();
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Parse markup with the process-wide extension registry.
    pub fn parse(html: &str) -> Self {
        Self::parse_with(html, ExtensionRegistry::global())
    }

    pub fn parse_with(html: &str, registry: &ExtensionRegistry) -> Self {
        let mut doc = Self {
            blocks: parse::parse_blocks(html, registry),
        };
        doc.normalize_with(registry);
        doc
    }

    pub fn serialize(&self) -> String {
        self.serialize_with(ExtensionRegistry::global())
    }

    pub fn serialize_with(&self, registry: &ExtensionRegistry) -> String {
        serialize::serialize_blocks(&self.blocks, registry)
    }

    pub fn text_blocks(&self) -> Vec<&TextBlock> {
        let mut out = Vec::new();
        collect_text_blocks(&self.blocks, &mut out);
        out
    }

    pub fn text_block(&self, index: usize) -> Option<&TextBlock> {
        self.text_blocks().into_iter().nth(index)
    }

    pub fn text_block_count(&self) -> usize {
        self.text_blocks().len()
    }

    /// Plain text with blocks separated by newlines.
    pub fn text(&self) -> String {
        self.text_blocks()
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        let blocks = self.text_blocks();
        blocks.len() == 1 && blocks[0].is_empty() && blocks[0].kind == BlockKind::Paragraph
    }

    pub fn flatten(&self) -> Vec<FlatBlock> {
        let mut out = Vec::new();
        flatten_into(&self.blocks, 0, &mut out);
        out
    }

    /// Edit the flattened form in place; the tree is rebuilt afterwards.
    pub fn edit_flat(&mut self, f: impl FnOnce(&mut Vec<FlatBlock>)) {
        let mut flat = self.flatten();
        f(&mut flat);
        self.blocks = build_blocks(&clamp_depths(flat), &mut 0, 0);
    }

    /// Run `f` on a copy of the document and return the normalized result.
    /// The receiver is untouched, so a transform is all-or-nothing.
    pub fn apply_transform(&self, f: impl FnOnce(&mut Document)) -> Document {
        let mut doc = self.clone();
        f(&mut doc);
        doc.normalize();
        doc
    }

    pub fn normalize(&mut self) {
        self.normalize_with(ExtensionRegistry::global());
    }

    /// Merge runs, prune no-op marks, and rebuild list structure so that
    /// lists are non-empty, items begin with a text block, and the document
    /// holds at least one block.
    pub fn normalize_with(&mut self, registry: &ExtensionRegistry) {
        let mut flat = self.flatten();
        for entry in &mut flat {
            entry.block.normalize(registry);
        }
        if flat.is_empty() {
            flat.push(FlatBlock::top_level(TextBlock::default()));
        }
        self.blocks = build_blocks(&clamp_depths(flat), &mut 0, 0);
    }
}

fn collect_text_blocks<'a>(blocks: &'a [Block], out: &mut Vec<&'a TextBlock>) {
    for block in blocks {
        match block {
            Block::Text(text) => out.push(text),
            Block::BulletList(items) => {
                for item in items {
                    collect_text_blocks(&item.blocks, out);
                }
            }
        }
    }
}

fn flatten_into(blocks: &[Block], depth: usize, out: &mut Vec<FlatBlock>) {
    for block in blocks {
        match block {
            Block::Text(text) => out.push(FlatBlock {
                block: text.clone(),
                depth,
                starts_item: false,
            }),
            Block::BulletList(items) => {
                for item in items {
                    let first = out.len();
                    if !matches!(item.blocks.first(), Some(Block::Text(_))) {
                        out.push(FlatBlock {
                            block: TextBlock::default(),
                            depth: depth + 1,
                            starts_item: true,
                        });
                    }
                    flatten_into(&item.blocks, depth + 1, out);
                    if let Some(entry) = out.get_mut(first) {
                        entry.starts_item = true;
                    }
                }
            }
        }
    }
}

/// A block can be at most one level deeper than its predecessor, and a
/// block entering a deeper level always opens a new list item.
fn clamp_depths(mut flat: Vec<FlatBlock>) -> Vec<FlatBlock> {
    let mut prev = 0;
    for entry in &mut flat {
        entry.depth = entry.depth.min(prev + 1);
        if entry.depth == 0 {
            entry.starts_item = false;
        } else if entry.depth > prev {
            entry.starts_item = true;
        }
        prev = entry.depth;
    }
    flat
}

fn build_blocks(flat: &[FlatBlock], pos: &mut usize, depth: usize) -> Vec<Block> {
    let mut out = Vec::new();
    while let Some(next) = flat.get(*pos) {
        if next.depth < depth {
            break;
        }
        if next.depth == depth {
            if depth > 0 && next.starts_item && !out.is_empty() {
                break;
            }
            out.push(Block::Text(next.block.clone()));
            *pos += 1;
        } else {
            out.push(Block::BulletList(build_items(flat, pos, depth + 1)));
        }
    }
    out
}

fn build_items(flat: &[FlatBlock], pos: &mut usize, depth: usize) -> Vec<ListItem> {
    let mut items = Vec::new();
    while flat.get(*pos).is_some_and(|next| next.depth >= depth) {
        items.push(ListItem {
            blocks: build_blocks(flat, pos, depth),
        });
    }
    items
}
