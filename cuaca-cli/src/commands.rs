//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::render;
use cuaca_core::{CuacaConfig, Session};
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config: CuacaConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace, &config),
        Commands::Predict {
            temperature,
            humidity,
            json,
        } => handle_predict(&config, temperature, humidity, json).await,
        Commands::Info => handle_info(&config).await,
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config: &CuacaConfig,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = cuaca_core::config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let default_config = CuacaConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

async fn handle_predict(
    config: &CuacaConfig,
    temperature: f64,
    humidity: f64,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::start(config).await?;
    let result = session.predict(temperature, humidity)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::prediction(&result, config.display.bar_width));
    }
    session.close();
    Ok(())
}

async fn handle_info(config: &CuacaConfig) -> anyhow::Result<()> {
    let session = Session::start(config).await?;
    print!("{}", render::info(&session));
    session.close();
    Ok(())
}
