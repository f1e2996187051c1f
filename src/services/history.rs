use crate::domain::constants::HISTORY_FILE;
use crate::domain::models::{HistoryCheckReport, HistoryConfig, HistoryEntry};
use crate::engine::context::RequestContext;
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Append-only JSON-lines log of executed commands.
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the context's command unless it is exempt (`dnt`), unset, or
    /// the query was blank.
    pub fn record(&self, ctx: &RequestContext) -> anyhow::Result<bool> {
        if !ctx.should_record() || ctx.full_query.trim().is_empty() {
            return Ok(false);
        }
        let Some(command) = &ctx.resolved_command_name else {
            return Ok(false);
        };
        self.append(&HistoryEntry {
            command: command.clone(),
            full_query: ctx.full_query.clone(),
            timestamp: Utc::now(),
        })?;
        Ok(true)
    }

    pub fn append(&self, entry: &HistoryEntry) -> anyhow::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("history write lock poisoned"))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    /// Entries in file order. Unreadable lines are skipped.
    pub fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let mut out = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => out.push(entry),
                Err(e) => tracing::warn!(line = idx + 1, error = %e, "skipping history line"),
            }
        }
        Ok(out)
    }

    pub fn check(&self) -> anyhow::Result<HistoryCheckReport> {
        let mut report = HistoryCheckReport {
            path: self.path.to_string_lossy().to_string(),
            exists: self.path.exists(),
            valid_entries: 0,
            invalid_lines: vec![],
        };
        if !report.exists {
            return Ok(report);
        }
        for (idx, line) in std::fs::read_to_string(&self.path)?.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if serde_json::from_str::<HistoryEntry>(line).is_ok() {
                report.valid_entries += 1;
            } else {
                report.invalid_lines.push(idx + 1);
            }
        }
        Ok(report)
    }

    /// Truncates the log and returns how many entries it held.
    pub fn clear(&self) -> anyhow::Result<usize> {
        let removed = self.load()?.len();
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("history write lock poisoned"))?;
        if self.path.exists() {
            std::fs::write(&self.path, "")?;
        }
        Ok(removed)
    }
}

/// Where history lives for this process and whether queries are recorded.
pub struct HistorySetup {
    pub store: Arc<HistoryStore>,
    pub enabled: bool,
}

impl HistorySetup {
    /// `--history-file` beats the config path, which beats the default.
    pub fn resolve(flag: Option<&Path>, config: &HistoryConfig) -> anyhow::Result<Self> {
        let path = match (flag, &config.path) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) => p.clone(),
            (None, None) => HistoryStore::default_path()?,
        };
        Ok(Self {
            store: Arc::new(HistoryStore::new(path)),
            enabled: config.enabled,
        })
    }

    pub fn recording(&self) -> Option<Arc<HistoryStore>> {
        self.enabled.then(|| self.store.clone())
    }
}

/// Newest first, tab separated.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no history yet".to_string();
    }
    entries
        .iter()
        .rev()
        .map(|e| {
            format!(
                "{}\t{}\t{}",
                e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                e.command,
                e.full_query
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
