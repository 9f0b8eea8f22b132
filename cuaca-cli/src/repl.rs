//! Interactive prediction loop.

use crate::render;
use cuaca_core::Session;
use cuaca_core::config::DisplayConfig;
use dialoguer::Input;
use std::path::Path;

/// A command entered at the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Predict,
    Upload(Option<String>),
    Preview,
    Info,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse one prompt line. An empty line means `predict`.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, Some(rest.trim())),
            None => (line, None),
        };
        match cmd.to_ascii_lowercase().as_str() {
            "" | "predict" | "p" => Self::Predict,
            "upload" | "u" => Self::Upload(arg.filter(|a| !a.is_empty()).map(str::to_string)),
            "preview" | "head" => Self::Preview,
            "info" | "i" => Self::Info,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(cmd.to_string()),
        }
    }
}

const HELP: &str = "\
  predict          enter temperature and humidity and classify (default)
  upload <path>    replace the reference dataset with a .csv or .txt file
  preview          show the first rows of the reference dataset
  info             show model, dataset and default inputs
  quit             end the session";

/// Run the interactive session until the user quits.
pub async fn run_interactive(mut session: Session, display: DisplayConfig) -> anyhow::Result<()> {
    println!("\x1b[1;36m");
    println!("  Weather classification");
    println!("\x1b[0m");
    println!(
        "  Model: {} | Dataset: {} ({} rows)",
        session.model().kind(),
        session.dataset().info().location,
        session.dataset().row_count()
    );
    println!("  Type help for commands, quit to exit\n");

    loop {
        let line: String = Input::new()
            .with_prompt("cuaca")
            .default("predict".to_string())
            .interact_text()?;

        match ReplCommand::parse(&line) {
            ReplCommand::Predict => prompt_and_predict(&session, &display)?,
            ReplCommand::Upload(path) => {
                let path = match path {
                    Some(p) => p,
                    None => Input::new().with_prompt("File to upload").interact_text()?,
                };
                match session.upload(Path::new(&path)).await {
                    Ok(dataset) => println!(
                        "  Loaded {} rows, {} columns from {}\n",
                        dataset.row_count(),
                        dataset.column_count(),
                        path
                    ),
                    Err(e) => println!("  \x1b[1;31m{e}\x1b[0m\n  Keeping the previous dataset.\n"),
                }
            }
            ReplCommand::Preview => {
                println!("{}", render::preview(session.dataset(), display.preview_rows));
            }
            ReplCommand::Info => println!("{}", render::info(&session)),
            ReplCommand::Help => println!("{HELP}\n"),
            ReplCommand::Quit => {
                println!("Goodbye!");
                break;
            }
            ReplCommand::Unknown(cmd) => {
                println!("  Unknown command: {cmd}. Type help for commands.\n");
            }
        }
    }

    session.close();
    Ok(())
}

fn prompt_and_predict(session: &Session, display: &DisplayConfig) -> anyhow::Result<()> {
    let defaults = session.input_defaults();
    let inputs = session.inputs();

    let temperature: f64 = Input::new()
        .with_prompt(&inputs.temperature_column)
        .default(defaults.temperature)
        .interact_text()?;
    let humidity: f64 = Input::new()
        .with_prompt(&inputs.humidity_column)
        .default(defaults.humidity)
        .interact_text()?;

    match session.predict(temperature, humidity) {
        Ok(result) => println!("\n{}", render::prediction(&result, display.bar_width)),
        Err(e) => println!("  \x1b[1;31m{e}\x1b[0m\n"),
    }
    Ok(())
}
