// src/task.rs - Task creation form hosting the description editor

use crate::editor::{Editor, EditorKey};
use crate::sync::Reconcile;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Please fill all fields (missing {0})")]
    MissingField(&'static str),
    #[error("failed to encode task: {0}")]
    Json(#[from] serde_json::Error),
}

/// Body of the create-task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    /// Serialized rich-text markup.
    pub description: String,
    pub due_date: String,
}

impl NewTask {
    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Title, rich-text description and due date. The description mirrors the
/// editor through its change callback.
#[derive(Debug)]
pub struct TaskForm {
    pub title: String,
    pub due_date: String,
    description: Rc<RefCell<String>>,
    editor: Editor,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        let description = Rc::new(RefCell::new(String::new()));
        let editor = mount_editor(&description);
        Self {
            title: String::new(),
            due_date: String::new(),
            description,
            editor,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn editor_key(&self) -> EditorKey {
        self.editor.key()
    }

    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    /// Host-side write of the description, passed on to the editor.
    pub fn set_description(&mut self, html: &str) -> Reconcile {
        *self.description.borrow_mut() = html.to_string();
        self.editor.set_external_value(html)
    }

    /// Validate and produce the request body, then clear the form.
    pub fn submit(&mut self) -> Result<NewTask, TaskError> {
        let description = self.description();
        if self.title.trim().is_empty() {
            return Err(TaskError::MissingField("title"));
        }
        if description.trim().is_empty() || self.editor.state().doc.text().trim().is_empty() {
            return Err(TaskError::MissingField("description"));
        }
        if self.due_date.trim().is_empty() {
            return Err(TaskError::MissingField("due_date"));
        }
        let task = NewTask {
            title: self.title.clone(),
            description,
            due_date: self.due_date.clone(),
        };
        self.reset();
        Ok(task)
    }

    /// Clear every field and remount the editor under a fresh key. Any
    /// edit in flight on the old editor is discarded with it.
    pub fn reset(&mut self) {
        self.title.clear();
        self.due_date.clear();
        self.description = Rc::new(RefCell::new(String::new()));
        self.editor = mount_editor(&self.description);
        debug!("task form reset, editor remounted as {}", self.editor.key());
    }
}

fn mount_editor(description: &Rc<RefCell<String>>) -> Editor {
    let sink = Rc::clone(description);
    Editor::new("", move |html| *sink.borrow_mut() = html.to_string())
}
