// src/sync.rs - Reconciles the host's markup value with the live document

use crate::command::CommandError;
use crate::document::Document;
use crate::state::EditorState;
use log::{debug, trace};
use std::fmt;

/// Outcome of feeding a host value into the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// The value already describes the current document.
    Unchanged,
    /// Empty values never replace the document.
    Ignored,
    /// The document was replaced and the selection reset.
    Replaced,
}

/// Owns the live editor state. Host values enter through
/// [`SyncBridge::external_change`]; edits leave through the change callback,
/// once per committed state whose document differs.
pub struct SyncBridge {
    state: EditorState,
    on_change: Box<dyn FnMut(&str)>,
}

impl SyncBridge {
    pub fn new(value: &str, on_change: impl FnMut(&str) + 'static) -> Self {
        let doc = if value.trim().is_empty() {
            Document::new()
        } else {
            Document::parse(value)
        };
        Self {
            state: EditorState::new(doc),
            on_change: Box::new(on_change),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn html(&self) -> String {
        self.state.doc.serialize()
    }

    pub fn external_change(&mut self, value: &str) -> Reconcile {
        if value.trim().is_empty() {
            trace!("ignoring empty external value");
            return Reconcile::Ignored;
        }
        if value == self.html() {
            trace!("external value matches document, echo suppressed");
            return Reconcile::Unchanged;
        }
        let doc = Document::parse(value);
        if doc == self.state.doc {
            trace!("external value parses to the current document");
            return Reconcile::Unchanged;
        }
        debug!("replacing document from external value ({} bytes)", value.len());
        self.state = EditorState::new(doc);
        Reconcile::Replaced
    }

    /// Install `next`, notifying the host if the document changed. Returns
    /// whether a notification was sent.
    pub fn commit(&mut self, next: EditorState) -> bool {
        let changed = next.doc != self.state.doc;
        self.state = next;
        if changed {
            let html = self.html();
            debug!("emitting {} bytes to host", html.len());
            (self.on_change)(&html);
        }
        changed
    }

    /// Run one edit against the current state and commit its result. A
    /// failed edit leaves the state untouched.
    pub fn update(
        &mut self,
        edit: impl FnOnce(&EditorState) -> Result<EditorState, CommandError>,
    ) -> Result<bool, CommandError> {
        let next = edit(&self.state)?;
        Ok(self.commit(next))
    }
}

impl fmt::Debug for SyncBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncBridge")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
