// src/state.rs - The value every command consumes and produces

use crate::command::CommandError;
use crate::document::{Document, MarkSet, Run};
use crate::selection::Selection;

/// Document, selection and the marks queued for the next typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Selection,
    /// Set by mark commands on a collapsed selection; consumed by the next
    /// insertion and dropped when the selection moves.
    pub stored_marks: Option<MarkSet>,
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: Selection::start(),
            stored_marks: None,
        }
    }

    pub fn parse(html: &str) -> Self {
        Self::new(Document::parse(html))
    }

    pub fn check_selection(&self) -> Result<(), CommandError> {
        if self.selection.resolves_in(&self.doc) {
            Ok(())
        } else {
            Err(CommandError::StaleSelection {
                selection: self.selection,
            })
        }
    }

    /// Move the selection. Stored marks survive only if nothing moved.
    pub fn with_selection(&self, selection: Selection) -> Result<Self, CommandError> {
        let next = Self {
            doc: self.doc.clone(),
            selection,
            stored_marks: if selection == self.selection {
                self.stored_marks.clone()
            } else {
                None
            },
        };
        next.check_selection()?;
        Ok(next)
    }

    /// Marks that typing at the head would produce.
    pub fn cursor_marks(&self) -> MarkSet {
        if let Some(marks) = &self.stored_marks {
            return marks.clone();
        }
        let head = self.selection.head;
        self.doc
            .text_block(head.block)
            .map(|block| block.marks_at(head.offset))
            .unwrap_or_default()
    }

    /// Runs with a non-empty overlap with the selection, in document order.
    pub fn selected_runs(&self) -> Vec<&Run> {
        let sel = &self.selection;
        self.doc
            .text_blocks()
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| sel.blocks().contains(idx))
            .flat_map(|(idx, block)| block.runs_in(sel.range_in(idx, block.len())))
            .collect()
    }
}
