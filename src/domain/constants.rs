pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 12345;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Relative to `$HOME`.
pub const CONFIG_FILE: &str = ".config/bunnylol/config.toml";
/// Relative to `$HOME`.
pub const HISTORY_FILE: &str = ".local/share/bunnylol/history.jsonl";
