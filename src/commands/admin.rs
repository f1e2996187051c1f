use crate::*;

pub fn handle_history_commands(cli: &Cli, history: &HistorySetup) -> anyhow::Result<bool> {
    let Commands::History { command } = &cli.command else {
        return Ok(false);
    };
    let store = &history.store;

    match command {
        HistoryCommands::List { limit } => {
            let entries = store.load()?;
            let start = limit
                .map(|n| entries.len().saturating_sub(n))
                .unwrap_or(0);
            let recent = &entries[start..];
            let newest_first: Vec<&HistoryEntry> = recent.iter().rev().collect();
            emit_one(cli.json, newest_first, |_| render_history(recent))?;
        }
        HistoryCommands::Check => {
            let report = store.check()?;
            let healthy = report.invalid_lines.is_empty();
            emit_one(cli.json, report, |r| {
                if !r.exists {
                    format!("{}: no history file", r.path)
                } else if r.invalid_lines.is_empty() {
                    format!("{}: {} entries ok", r.path, r.valid_entries)
                } else {
                    let lines: Vec<String> =
                        r.invalid_lines.iter().map(|n| n.to_string()).collect();
                    format!(
                        "{}: {} entries ok, invalid lines: {}",
                        r.path,
                        r.valid_entries,
                        lines.join(", ")
                    )
                }
            })?;
            if !healthy {
                std::process::exit(1);
            }
        }
        HistoryCommands::Clear => {
            let removed = store.clear()?;
            tracing::info!(removed, path = %store.path().display(), "history cleared");
            emit_one(cli.json, ClearReport { removed }, |r| {
                format!("removed {} entries", r.removed)
            })?;
        }
    }

    Ok(true)
}
