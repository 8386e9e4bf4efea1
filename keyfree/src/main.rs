//! KeyFree Companion
//!
//! Keyboard simulation and per-app volume control over HTTP.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use keyfree_lib::input::{InputDispatcher, KeyboardSimulator, available_keys};
use keyfree_lib::state::{AppConfig, ConfigManager};
use keyfree_lib::utils::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "keyfree")]
#[command(about = "Keyboard simulation and per-app volume control over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server (default)
    Serve {
        /// Listen address (overrides config setting)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config setting)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List every accepted key name
    Keys,

    /// Press a, ctrl+c and ctrl+shift+s after a short countdown
    Test,

    /// Show the effective configuration
    Config {
        /// Overwrite the configuration file with defaults
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigManager::default_path()?,
    };
    let reset = matches!(cli.command, Some(Commands::Config { reset: true }));
    let config = ConfigManager::open(&config_path, reset)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_logging(&config.logging.filter);

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => cmd_serve(config, host, port).await,
        Commands::Keys => cmd_keys(),
        Commands::Test => cmd_test(),
        Commands::Config { .. } => cmd_config(&config_path, &config),
    }
}

async fn cmd_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    keyfree_lib::run(config).await?;
    Ok(())
}

fn cmd_keys() -> Result<()> {
    for key in available_keys() {
        println!("{}", key);
    }
    Ok(())
}

fn cmd_test() -> Result<()> {
    let keyboard = KeyboardSimulator::new().context("Keyboard simulator not available")?;
    let mut dispatcher = InputDispatcher::new(keyboard);

    println!("Testing keyboard simulator, focus a text field...");
    for remaining in (1..=3).rev() {
        println!("  {}...", remaining);
        thread::sleep(Duration::from_secs(1));
    }

    println!("Testing single key press (a)...");
    dispatcher.single("a")?;
    thread::sleep(Duration::from_millis(500));

    println!("Testing key combination (ctrl+c)...");
    dispatcher.chord(&["ctrl", "c"])?;
    thread::sleep(Duration::from_millis(500));

    println!("Testing three-key combination (ctrl+shift+s)...");
    dispatcher.chord(&["ctrl", "shift", "s"])?;

    println!("Keyboard simulator test completed successfully");
    Ok(())
}

fn cmd_config(path: &Path, config: &AppConfig) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
