use crate::domain::constants::CONFIG_FILE;
use crate::domain::models::Config;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(CONFIG_FILE))
}

/// Loads `config.toml`; a missing default file yields defaults, a missing
/// explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let display = path.to_string_lossy().to_string();
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;
    Ok(config)
}
