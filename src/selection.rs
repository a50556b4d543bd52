// src/selection.rs - Explicit cursor/range values over a document

use crate::document::Document;
use std::fmt;

/// A point in the document: text block index (document order) and char
/// offset inside that block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    pub fn resolves_in(&self, doc: &Document) -> bool {
        doc.text_block(self.block)
            .is_some_and(|block| self.offset <= block.len())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// Anchor stays put while the head moves; either may come first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(at: Position) -> Self {
        Self::new(at, at)
    }

    /// Cursor at the start of the document.
    pub fn start() -> Self {
        Self::default()
    }

    pub fn all(doc: &Document) -> Self {
        let last = doc.text_block_count().saturating_sub(1);
        let len = doc.text_block(last).map_or(0, |b| b.len());
        Self::new(Position::default(), Position::new(last, len))
    }

    pub fn from(&self) -> Position {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> Position {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn resolves_in(&self, doc: &Document) -> bool {
        self.anchor.resolves_in(doc) && self.head.resolves_in(doc)
    }

    /// Text blocks touched by the selection.
    pub fn blocks(&self) -> std::ops::RangeInclusive<usize> {
        self.from().block..=self.to().block
    }

    /// Char range of the selection inside text block `index`.
    pub fn range_in(&self, index: usize, block_len: usize) -> std::ops::Range<usize> {
        let (from, to) = (self.from(), self.to());
        let start = if index == from.block { from.offset } else { 0 };
        let end = if index == to.block { to.offset } else { block_len };
        start.min(end)..end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.head)
        } else {
            write!(f, "{}-{}", self.anchor, self.head)
        }
    }
}
