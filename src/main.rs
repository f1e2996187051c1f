use clap::Parser;
use std::sync::Arc;

mod cli;
mod commands;
mod domain;
mod engine;
mod services;

pub use cli::*;
pub use commands::*;
pub use domain::models::*;
pub use engine::catalog::{builtin_registry, listing_lines};
pub use engine::context::{Outcome, RequestContext};
pub use engine::registry::{Registry, RegistryError};
pub use services::config::{load_config, ConfigError};
pub use services::history::{render_history, HistorySetup};
pub use services::logging::init_logging;
pub use services::output::{emit_error, emit_one};
pub use services::redirect::href;
pub use services::server::{serve, AppState};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        emit_error(cli.json, error_code(&err), &format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.log.level)?;

    let registry = Arc::new(builtin_registry()?);
    let history = HistorySetup::resolve(cli.history_file.as_deref(), &config.history)?;

    if handle_history_commands(cli, &history)? {
        return Ok(());
    }
    handle_runtime_commands(cli, &config, registry, &history)?;
    Ok(())
}

fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ConfigError>().is_some() {
        "CONFIG_INVALID"
    } else if err.downcast_ref::<RegistryError>().is_some() {
        "REGISTRY_INVALID"
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        "IO_ERROR"
    } else {
        "INTERNAL"
    }
}
