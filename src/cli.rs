use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bunnylol", version, about = "Bang-command URL redirector")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: ~/.config/bunnylol/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "History file, overrides the config")]
    pub history_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve queries over HTTP.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one query and print the outcome.
    Query {
        #[arg(long, default_value_t = false, help = "Do not record this query")]
        no_history: bool,
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// List commands and aliases.
    List,
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// Show recorded queries, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Validate the history file.
    Check,
    /// Remove all recorded queries.
    Clear,
}
