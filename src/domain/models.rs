use crate::domain::constants::{DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_PORT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Defaults to `$HOME/.local/share/bunnylol/history.jsonl`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One line of the history file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: String,
    pub full_query: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HistoryCheckReport {
    pub path: String,
    pub exists: bool,
    pub valid_entries: usize,
    pub invalid_lines: Vec<usize>,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct ClearReport {
    pub removed: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct QueryReport {
    pub query: String,
    pub command: Option<String>,
    /// `redirect` or `text`.
    pub kind: String,
    pub location: Option<String>,
    pub body: Option<String>,
    pub recorded: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub aliases: Vec<String>,
    /// Aliases that currently route to this command.
    pub resolving_aliases: Vec<String>,
    pub description: String,
    pub default: bool,
    pub strategy: crate::engine::parsing::ParseStrategy,
    pub skip_first: bool,
}
