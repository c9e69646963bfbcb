//! # Hookbot Server
//!
//! Loads configuration, sets up the built-in and requested robots, and
//! serves webhooks until interrupted.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hookbot::logging::{init_error_reporting, init_structured_logging};
use hookbot::{Hookbot, HookbotConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "hookbot")]
#[command(about = "Dispatch webhook deliveries to robots")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plugins to load after the configured ones
    plugins: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = HookbotConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_structured_logging(&config.logging);
    let _sentry = init_error_reporting(config.sentry_dsn.as_deref());

    let plugins: Vec<String> = config
        .plugins
        .iter()
        .cloned()
        .chain(cli.plugins)
        .collect();
    info!(plugins = ?plugins, "Starting hookbot");

    let app = Hookbot::new(config).context("initializing app")?;
    app.setup(plugins).context("loading plugins")?;
    app.start().await.context("serving webhooks")?;

    Ok(())
}
