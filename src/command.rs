// src/command.rs - Named editing commands exposed to the toolbar
//
// Every command is a pure function of the editor state: it either yields a
// complete new state or an error, never a partially edited document.

use crate::commands::{blocks, marks};
use crate::document::{HeadingLevel, MarkKind};
use crate::selection::Selection;
use crate::state::EditorState;
use log::debug;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("selection {selection} does not resolve against the current document")]
    StaleSelection { selection: Selection },
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("command `{0}` requires an argument")]
    MissingArgument(&'static str),
    #[error("heading level must be between 1 and 4, got `{0}`")]
    InvalidHeadingLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleBold,
    ToggleItalic,
    ToggleBulletList,
    SetParagraph,
    ToggleHeading(HeadingLevel),
    /// `None` clears the attribute.
    SetFontSize(Option<String>),
    SetFontFamily(Option<String>),
}

/// Every name accepted by [`Command::from_name`].
pub const COMMAND_NAMES: &[&str] = &[
    "toggleBold",
    "toggleItalic",
    "toggleBulletList",
    "setParagraph",
    "toggleHeading",
    "setFontSize",
    "setFontFamily",
];

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleBold => "toggleBold",
            Command::ToggleItalic => "toggleItalic",
            Command::ToggleBulletList => "toggleBulletList",
            Command::SetParagraph => "setParagraph",
            Command::ToggleHeading(_) => "toggleHeading",
            Command::SetFontSize(_) => "setFontSize",
            Command::SetFontFamily(_) => "setFontFamily",
        }
    }

    /// Resolve a toolbar invocation. Attribute commands treat a missing or
    /// blank argument as "clear".
    pub fn from_name(name: &str, arg: Option<&str>) -> Result<Self, CommandError> {
        let value = arg.map(str::trim).filter(|v| !v.is_empty());
        match name {
            "toggleBold" => Ok(Command::ToggleBold),
            "toggleItalic" => Ok(Command::ToggleItalic),
            "toggleBulletList" => Ok(Command::ToggleBulletList),
            "setParagraph" => Ok(Command::SetParagraph),
            "toggleHeading" => {
                let raw = value.ok_or(CommandError::MissingArgument("toggleHeading"))?;
                raw.parse()
                    .ok()
                    .and_then(HeadingLevel::new)
                    .map(Command::ToggleHeading)
                    .ok_or_else(|| CommandError::InvalidHeadingLevel(raw.to_string()))
            }
            "setFontSize" => Ok(Command::SetFontSize(value.map(str::to_string))),
            "setFontFamily" => Ok(Command::SetFontFamily(value.map(str::to_string))),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    pub fn argument(&self) -> Option<String> {
        match self {
            Command::ToggleHeading(level) => Some(level.get().to_string()),
            Command::SetFontSize(value) | Command::SetFontFamily(value) => value.clone(),
            _ => None,
        }
    }

    pub fn apply(&self, state: &EditorState) -> Result<EditorState, CommandError> {
        state.check_selection()?;
        debug!("applying {} at {}", self, state.selection);
        let next = match self {
            Command::ToggleBold => marks::toggle_mark(state, MarkKind::Bold),
            Command::ToggleItalic => marks::toggle_mark(state, MarkKind::Italic),
            Command::ToggleBulletList => blocks::toggle_bullet_list(state),
            Command::SetParagraph => blocks::set_paragraph(state),
            Command::ToggleHeading(level) => blocks::toggle_heading(state, *level),
            Command::SetFontSize(value) => marks::set_text_style_attr(state, "fontSize", value.as_deref()),
            Command::SetFontFamily(value) => {
                marks::set_text_style_attr(state, "fontFamily", value.as_deref())
            }
        };
        Ok(next)
    }
}

/// Formats as `name` or `name:argument`, the form [`Command::from_str`] reads.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(arg) => write!(f, "{}:{}", self.name(), arg),
            None => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, arg)) => Command::from_name(name.trim(), Some(arg)),
            None => Command::from_name(s.trim(), None),
        }
    }
}
