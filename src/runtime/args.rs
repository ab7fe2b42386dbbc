//! Command-line argument parsing

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "shortify", version, about = "URL shortener and PDF-to-LaTeX relay")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the URL shortener (default)
    Shortener,
    /// Run the PDF-to-LaTeX upload relay
    Relay,
    /// Print a sample configuration file
    ConfigGen,
}

impl Args {
    /// Subcommand to run, defaulting to the shortener
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Shortener)
    }
}
