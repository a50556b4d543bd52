// src/toolbar.rs - Toolbar activity projection and menu descriptors

use crate::command::Command;
use crate::config::{EditorConfig, Preset};
use crate::document::{BlockKind, HeadingLevel, MarkKind, MarkSet};
use crate::state::EditorState;
use serde::Serialize;

/// Value of a text style attribute across the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "camelCase")]
pub enum AttributeState {
    /// Every selected run agrees; `None` means the attribute is unset.
    Uniform(Option<String>),
    Mixed,
}

impl AttributeState {
    fn collect<'a>(mut values: impl Iterator<Item = Option<&'a str>>) -> Self {
        let Some(first) = values.next() else {
            return AttributeState::Uniform(None);
        };
        if values.all(|value| value == first) {
            AttributeState::Uniform(first.map(str::to_string))
        } else {
            AttributeState::Mixed
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            AttributeState::Uniform(value) => value.as_deref(),
            AttributeState::Mixed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub bold: bool,
    pub italic: bool,
    pub bullet_list: bool,
    pub paragraph: bool,
    /// Indexed by heading level minus one.
    pub headings: [bool; HeadingLevel::MAX as usize],
    pub font_size: AttributeState,
    pub font_family: AttributeState,
}

impl ToolbarState {
    pub fn heading(&self, level: HeadingLevel) -> bool {
        self.headings[usize::from(level.get() - 1)]
    }

    /// Whether the toolbar control issuing `command` shows as active.
    pub fn is_active(&self, command: &Command) -> bool {
        match command {
            Command::ToggleBold => self.bold,
            Command::ToggleItalic => self.italic,
            Command::ToggleBulletList => self.bullet_list,
            Command::SetParagraph => self.paragraph,
            Command::ToggleHeading(level) => self.heading(*level),
            Command::SetFontSize(value) => {
                value.is_some() && self.font_size == AttributeState::Uniform(value.clone())
            }
            Command::SetFontFamily(value) => {
                value.is_some() && self.font_family == AttributeState::Uniform(value.clone())
            }
        }
    }
}

/// Project the toolbar state for `state`. Boolean controls are active only
/// when every selected run (or, for a collapsed selection, the cursor)
/// carries the state.
pub fn project(state: &EditorState) -> ToolbarState {
    let runs = state.selected_runs();
    let mark_sets: Vec<&MarkSet> = runs.iter().map(|run| &run.marks).collect();
    let cursor_marks;
    let mark_sets = if mark_sets.is_empty() {
        cursor_marks = state.cursor_marks();
        vec![&cursor_marks]
    } else {
        mark_sets
    };

    let flat = state.doc.flatten();
    let blocks: Vec<_> = state
        .selection
        .blocks()
        .filter_map(|idx| flat.get(idx))
        .collect();
    let all_blocks = |f: &dyn Fn(BlockKind, usize) -> bool| {
        !blocks.is_empty() && blocks.iter().all(|entry| f(entry.block.kind, entry.depth))
    };

    let mut headings = [false; HeadingLevel::MAX as usize];
    for level in HeadingLevel::all() {
        headings[usize::from(level.get() - 1)] =
            all_blocks(&|kind, _| kind == BlockKind::Heading(level));
    }

    ToolbarState {
        bold: mark_sets.iter().all(|marks| marks.contains(MarkKind::Bold)),
        italic: mark_sets.iter().all(|marks| marks.contains(MarkKind::Italic)),
        bullet_list: all_blocks(&|_, depth| depth > 0),
        paragraph: all_blocks(&|kind, _| kind == BlockKind::Paragraph),
        headings,
        font_size: AttributeState::collect(mark_sets.iter().map(|marks| marks.attr("fontSize"))),
        font_family: AttributeState::collect(
            mark_sets.iter().map(|marks| marks.attr("fontFamily")),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub command: String,
}

impl MenuItem {
    fn new(label: impl Into<String>, command: &Command) -> Self {
        Self {
            label: label.into(),
            command: command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarMenus {
    pub headings: Vec<MenuItem>,
    pub font_sizes: Vec<MenuItem>,
    pub font_families: Vec<MenuItem>,
}

impl ToolbarMenus {
    pub fn from_config(config: &EditorConfig) -> Self {
        let presets = |list: &[Preset], make: fn(Option<String>) -> Command| -> Vec<MenuItem> {
            list.iter()
                .map(|preset| MenuItem::new(&preset.label, &make(Some(preset.value.clone()))))
                .collect()
        };

        let mut headings = vec![MenuItem::new("Normal Text", &Command::SetParagraph)];
        headings.extend(HeadingLevel::all().map(|level| {
            MenuItem::new(
                format!("Heading {}", level.get()),
                &Command::ToggleHeading(level),
            )
        }));

        Self {
            headings,
            font_sizes: presets(&config.font_sizes, Command::SetFontSize),
            font_families: presets(&config.font_families, Command::SetFontFamily),
        }
    }
}
