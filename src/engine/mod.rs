//! Command engine: registry, resolution and the invocation lifecycle.
//!
//! ## Files
//! - `registry.rs` — descriptors and the alias index.
//! - `parsing.rs` — parsing strategies (raw, whitespace, shell, two-token).
//! - `resolve.rs` — query → descriptor, including the fallback policy.
//! - `invoke.rs` — pre-hook / parse / execute / post-hook sequence.
//! - `context.rs` — per-query context and the outcome handed to transports.
//! - `catalog.rs` — built-in commands and the startup registration list.
//! - `calendar.rs` — the `cal` command.
//!
//! ## Rules
//! - No I/O in here. History and HTTP live in `services/*`.
//! - The registry is populated once, then only read.

pub mod calendar;
pub mod catalog;
pub mod context;
pub mod invoke;
pub mod parsing;
pub mod registry;
pub mod resolve;
