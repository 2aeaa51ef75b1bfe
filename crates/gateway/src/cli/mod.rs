pub mod ask;
pub mod config;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use tb_domain::config::Config;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TB_CONFIG";

/// Tutorbot: a conversational tutoring assistant backed by Gemini.
#[derive(Debug, Parser)]
#[command(name = "tutorbot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Send a single message and print the tutor's reply.
    Ask {
        /// The message to send.
        message: String,
        /// Session id (defaults to the configured default session).
        #[arg(long)]
        session: Option<String>,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `TB_CONFIG` (or `config.toml`).
/// A missing file yields the defaults. Returns the parsed [`Config`] and
/// the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(Path::new(&config_path))?;
    Ok((config, config_path))
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
