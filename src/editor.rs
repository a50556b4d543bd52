// src/editor.rs - Editor instance: identity, live state and the edit entry points

use crate::command::{Command, CommandError};
use crate::commands;
use crate::selection::Selection;
use crate::state::EditorState;
use crate::sync::{Reconcile, SyncBridge};
use crate::toolbar::{self, ToolbarState};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of one editor instance. A host resets an editor by replacing
/// it with one under a fresh key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorKey(u64);

impl EditorKey {
    pub fn fresh() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EditorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor-{}", self.0)
    }
}

#[derive(Debug)]
pub struct Editor {
    key: EditorKey,
    bridge: SyncBridge,
}

impl Editor {
    /// Mount an editor on `value`, reporting every edit to `on_change`.
    pub fn new(value: &str, on_change: impl FnMut(&str) + 'static) -> Self {
        Self {
            key: EditorKey::fresh(),
            bridge: SyncBridge::new(value, on_change),
        }
    }

    pub fn key(&self) -> EditorKey {
        self.key
    }

    pub fn state(&self) -> &EditorState {
        self.bridge.state()
    }

    pub fn selection(&self) -> Selection {
        self.bridge.state().selection
    }

    pub fn html(&self) -> String {
        self.bridge.html()
    }

    pub fn toolbar(&self) -> ToolbarState {
        toolbar::project(self.bridge.state())
    }

    pub fn set_external_value(&mut self, value: &str) -> Reconcile {
        self.bridge.external_change(value)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), CommandError> {
        let next = self.bridge.state().with_selection(selection)?;
        self.bridge.commit(next);
        Ok(())
    }

    /// Apply `cmd` at the current selection. Returns whether the document
    /// changed.
    pub fn execute_command(&mut self, cmd: &Command) -> Result<bool, CommandError> {
        self.bridge.update(|state| cmd.apply(state))
    }

    /// Toolbar entry point: resolve `name` and apply it.
    pub fn run(&mut self, name: &str, arg: Option<&str>) -> Result<bool, CommandError> {
        let cmd = Command::from_name(name, arg)?;
        self.execute_command(&cmd)
    }

    /// Apply `cmd` at an explicit selection, leaving it selected afterwards.
    pub fn execute_at(&mut self, cmd: &Command, selection: Selection) -> Result<bool, CommandError> {
        self.bridge.update(|state| {
            let state = state.with_selection(selection)?;
            cmd.apply(&state)
        })
    }

    pub fn insert_text(&mut self, text: &str) -> Result<bool, CommandError> {
        self.bridge.update(|state| commands::insert_text(state, text))
    }

    pub fn delete_backward(&mut self) -> Result<bool, CommandError> {
        self.bridge.update(commands::delete_backward)
    }

    pub fn split_block(&mut self) -> Result<bool, CommandError> {
        self.bridge.update(commands::split_block)
    }

    pub fn select_all(&mut self) {
        let next = commands::select_all(self.bridge.state());
        self.bridge.commit(next);
    }
}
