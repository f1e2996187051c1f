//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep config, history and report structs in one place.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — config, history entries, report/output structs.
//! - `constants.rs` — stable defaults (bind address, file locations).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and the history file.
//! Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
