//! Per-query context and the result type returned to the transport.

use std::net::SocketAddr;

/// Command name whose invocations never reach the history store.
pub const DO_NOT_TRACK: &str = "dnt";

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub full_query: String,
    pub resolved_command_name: Option<String>,
    pub peer: Option<SocketAddr>,
}

impl RequestContext {
    pub fn new(peer: Option<SocketAddr>) -> Self {
        Self {
            peer,
            ..Self::default()
        }
    }

    /// Context for queries issued from this machine (the CLI).
    pub fn local() -> Self {
        Self::new(Some(SocketAddr::from(([127, 0, 0, 1], 0))))
    }

    /// Best-effort guess from the peer address; not a security boundary.
    pub fn is_local(&self) -> bool {
        self.peer.map(|p| p.ip().is_loopback()).unwrap_or(false)
    }

    /// Records the command name unless an outer invocation already did.
    pub fn claim_command(&mut self, name: &str) {
        if self.resolved_command_name.is_none() {
            self.resolved_command_name = Some(name.to_string());
        }
    }

    pub fn should_record(&self) -> bool {
        match &self.resolved_command_name {
            Some(name) => !name.eq_ignore_ascii_case(DO_NOT_TRACK),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Help,
    History,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Help => "/help",
            Route::History => "/history",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    External(String),
    Internal { route: Route, query: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(Location),
    Text(String),
}

impl Outcome {
    pub fn help(query: Option<&str>) -> Self {
        Outcome::Redirect(Location::Internal {
            route: Route::Help,
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        })
    }
}
