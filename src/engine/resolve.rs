//! Query resolution: which descriptor handles a raw query.

use super::invoke::CallParams;
use super::parsing::split_two;
use super::registry::{CommandDescriptor, Registry};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Resolution {
    pub descriptor: Arc<CommandDescriptor>,
    /// The full original query; commands strip their own token via `skip_first`.
    pub query: String,
    pub params: CallParams,
    pub matched: bool,
}

impl Registry {
    pub fn resolve(&self, full_query: &str) -> Resolution {
        let (first, _) = split_two(full_query);
        if first.is_empty() {
            let help = self.help();
            return Resolution {
                params: CallParams::defaults_for(&help),
                descriptor: help,
                query: full_query.to_string(),
                matched: false,
            };
        }

        match self.lookup(&first.to_lowercase()) {
            Some(descriptor) => Resolution {
                descriptor: descriptor.clone(),
                query: full_query.to_string(),
                params: CallParams::defaults_for(descriptor),
                matched: true,
            },
            None => {
                // Unmatched first token stays part of the payload.
                let descriptor = self.fallback();
                tracing::debug!(token = first, fallback = descriptor.name(), "no alias matched");
                Resolution {
                    descriptor,
                    query: full_query.to_string(),
                    params: CallParams { skip_first: false },
                    matched: false,
                }
            }
        }
    }
}
