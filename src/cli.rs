use crate::command::Command;
use crate::document::Document;
use crate::selection::{Position, Selection};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "taskdesk")]
#[command(version = "0.1.0")]
#[command(about = "Headless rich-text task description editor")]
pub struct CliArgs {
    /// Config file to use instead of the discovered one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Apply commands to a document and print the resulting markup
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Command to apply, e.g. `toggleBold` or `setFontSize:20px`
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,
    },
    /// Print the toolbar state for a selection as JSON
    Toolbar {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the create-task request for a description
    Task {
        #[arg(long)]
        title: String,

        #[arg(long)]
        due_date: String,

        /// Markup file holding the description (stdin if omitted)
        #[arg(long)]
        description_file: Option<PathBuf>,
    },
    /// Print the toolbar menus
    Presets,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Markup file to load (stdin if omitted)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// `all`, `B:O` or `B:O-B:O`, with B a text block index and O a char offset
    #[arg(long, short = 's', default_value = "all")]
    pub select: SelectionArg,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid selection `{0}`, expected `all`, `B:O` or `B:O-B:O`")]
pub struct SelectionArgError(String);

/// Selection given on the command line, resolved once the document is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionArg {
    All,
    Range(Selection),
}

impl SelectionArg {
    pub fn resolve(&self, doc: &Document) -> Selection {
        match self {
            SelectionArg::All => Selection::all(doc),
            SelectionArg::Range(selection) => *selection,
        }
    }
}

fn parse_position(s: &str) -> Option<Position> {
    let (block, offset) = s.trim().split_once(':')?;
    Some(Position::new(block.parse().ok()?, offset.parse().ok()?))
}

impl FromStr for SelectionArg {
    type Err = SelectionArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            return Ok(SelectionArg::All);
        }
        let err = || SelectionArgError(s.to_string());
        let selection = match s.split_once('-') {
            Some((anchor, head)) => Selection::new(
                parse_position(anchor).ok_or_else(err)?,
                parse_position(head).ok_or_else(err)?,
            ),
            None => Selection::cursor(parse_position(s).ok_or_else(err)?),
        };
        Ok(SelectionArg::Range(selection))
    }
}

pub fn parse_commands(raw: &[String]) -> Result<Vec<Command>, crate::command::CommandError> {
    raw.iter().map(|s| s.parse()).collect()
}

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadingLevel;

    #[test]
    fn test_selection_arg() {
        assert_eq!("all".parse(), Ok(SelectionArg::All));
        assert_eq!(
            "1:4".parse(),
            Ok(SelectionArg::Range(Selection::cursor(Position::new(1, 4))))
        );
        assert_eq!(
            "0:2-3:0".parse(),
            Ok(SelectionArg::Range(Selection::new(
                Position::new(0, 2),
                Position::new(3, 0)
            )))
        );
        assert!("1".parse::<SelectionArg>().is_err());
        assert!("a:b".parse::<SelectionArg>().is_err());
    }

    #[test]
    fn test_resolve_all() {
        let doc = Document::parse("<p>ab</p><p>c</p>");
        assert_eq!(
            SelectionArg::All.resolve(&doc),
            Selection::new(Position::new(0, 0), Position::new(1, 1))
        );
    }

    #[test]
    fn test_parse_render() {
        let args = CliArgs::parse_from([
            "taskdesk",
            "render",
            "--select",
            "0:0-0:5",
            "-c",
            "toggleBold",
            "-c",
            "toggleHeading:2",
        ]);
        let CliCommand::Render { source, commands } = args.command else {
            panic!("expected render");
        };
        assert!(source.input.is_none());
        assert_eq!(
            parse_commands(&commands).unwrap(),
            vec![
                Command::ToggleBold,
                Command::ToggleHeading(HeadingLevel::new(2).unwrap())
            ]
        );
    }

    #[test]
    fn test_global_config_flag() {
        let args = CliArgs::parse_from(["taskdesk", "presets", "--config", "/tmp/t.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/t.toml")));
        assert!(matches!(args.command, CliCommand::Presets));
    }

    #[test]
    fn test_task_args() {
        let args = CliArgs::parse_from([
            "taskdesk",
            "task",
            "--title",
            "Ship",
            "--due-date",
            "2026-12-01",
        ]);
        let CliCommand::Task { title, due_date, description_file } = args.command else {
            panic!("expected task");
        };
        assert_eq!(title, "Ship");
        assert_eq!(due_date, "2026-12-01");
        assert!(description_file.is_none());
    }
}
