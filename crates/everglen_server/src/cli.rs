//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Everglen - high school story engine backed by a chat-completion model
#[derive(Parser, Debug)]
#[command(name = "everglen")]
#[command(about = "High school story engine backed by a chat-completion model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind, overriding the configured one
        #[arg(long)]
        bind: Option<String>,

        /// Insert the demo cast before serving
        #[arg(long)]
        seed: bool,
    },

    /// Insert the demo cast into the configured store
    Seed,
}
