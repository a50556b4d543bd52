use anyhow::{Context, Result};
use log::info;
use std::io::Read;
use std::path::Path;
use taskdesk::cli::{self, CliCommand, SourceArgs};
use taskdesk::config::TaskdeskConfig;
use taskdesk::editor::Editor;
use taskdesk::task::TaskForm;
use taskdesk::toolbar::ToolbarMenus;

fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn load_editor(source: &SourceArgs) -> Result<Editor> {
    let markup = read_source(source.input.as_deref())?;
    let mut editor = Editor::new(&markup, |_| {});
    let selection = source.select.resolve(&editor.state().doc);
    editor.set_selection(selection)?;
    Ok(editor)
}

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Initialize logger (set RUST_LOG env var to control verbosity)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = TaskdeskConfig::load(args.config.as_deref()).context("failed to load config")?;

    match args.command {
        CliCommand::Render { source, commands } => {
            let commands = cli::parse_commands(&commands)?;
            let mut editor = load_editor(&source)?;
            for cmd in &commands {
                editor.execute_command(cmd)?;
            }
            println!("{}", editor.html());
        }
        CliCommand::Toolbar { source } => {
            let editor = load_editor(&source)?;
            println!("{}", serde_json::to_string_pretty(&editor.toolbar())?);
        }
        CliCommand::Task {
            title,
            due_date,
            description_file,
        } => {
            let markup = read_source(description_file.as_deref())?;
            let mut form = TaskForm::new();
            form.title = title;
            form.due_date = due_date;
            form.set_description(markup.trim());
            let task = form.submit()?;
            info!("POST {}", config.api.tasks_endpoint());
            println!("{}", task.to_json()?);
        }
        CliCommand::Presets => {
            let menus = ToolbarMenus::from_config(&config.editor);
            println!("{}", serde_json::to_string_pretty(&menus)?);
        }
    }

    Ok(())
}
