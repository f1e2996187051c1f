//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` — `history list|check|clear`.
//! - `runtime.rs` — serve/query/list.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate command semantics to `engine/*` and I/O to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::handle_history_commands;
pub use runtime::handle_runtime_commands;
