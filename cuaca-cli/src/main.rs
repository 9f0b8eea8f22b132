//! Cuaca CLI: classify weather conditions from temperature and humidity.
//!
//! Provides an interactive session and one-shot subcommands.

mod commands;
mod render;
mod repl;

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Cuaca: weather classification from a pre-trained model
#[derive(Parser, Debug)]
#[command(name = "cuaca", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (relative resource paths resolve against it)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Reference dataset to use instead of the configured one
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Model artifact to use instead of the configured one
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand (starts an interactive session if omitted)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Classify one observation
    Predict {
        /// Temperature reading
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity reading
        #[arg(long)]
        humidity: f64,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show model, dataset and default inputs
    Info,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "cuaca", "cuaca")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "cuaca.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = cuaca_core::config::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    config.resolve_paths(&workspace);

    // CLI overrides are relative to the current directory
    if let Some(dataset) = &cli.dataset {
        config.resources.dataset = absolute(dataset);
    }
    if let Some(model) = &cli.model {
        config.resources.model = absolute(model);
    }

    if let Some(command) = cli.command {
        return commands::handle_command(command, &workspace, config).await;
    }

    let session = cuaca_core::Session::start(&config).await?;
    repl::run_interactive(session, config.display).await
}
