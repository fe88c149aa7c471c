//! Command-line interface for threadpick.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick Reddit threads for narrated videos")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, env = "THREADPICK_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select threads and print their payloads as JSON lines
    Select {
        /// Thread id to use instead of searching; several ids can be joined with `+`
        #[arg(long)]
        post_id: Option<String>,

        /// Write payloads to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Record a thread as processed so it is never selected by search again
    MarkDone {
        /// Reddit thread id
        id: String,

        #[arg(long, default_value = "")]
        subreddit: String,

        #[arg(long, default_value = "")]
        title: String,
    },
}
