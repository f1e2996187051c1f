//! Service layer: the I/O collaborators around the command engine.
//!
//! ## Service map
//! - `server.rs` — axum transport (`/`, `/help`, `/history`).
//! - `history.rs` — JSON-lines history store + text rendering.
//! - `redirect.rs` — outcome locations → URLs.
//! - `config.rs` — `config.toml` loading.
//! - `logging.rs` — tracing subscriber setup.
//! - `output.rs` — JSON/text output helpers for the CLI.
//!
//! ## Conventions
//! - The engine never calls into here; handlers wire the two together.
//! - Side effects should be explicit and localized.

pub mod config;
pub mod history;
pub mod logging;
pub mod output;
pub mod redirect;
pub mod server;
