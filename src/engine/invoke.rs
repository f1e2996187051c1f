//! Invocation lifecycle: pre-hook, parse, execute, post-hook.
//!
//! Every command goes through [`Registry::invoke`]. Failures inside the
//! lifecycle become ordinary [`Outcome`]s; nothing escapes to the transport.

use super::context::{Outcome, RequestContext};
use super::parsing::{split_two, ParseError, Parsed};
use super::registry::{CommandDescriptor, Registry};
use super::resolve::Resolution;

/// Behavior attached to a descriptor.
pub trait CommandBody: Send + Sync {
    fn run(&self, args: Parsed, call: &mut Call<'_>) -> Result<Outcome, CommandError>;

    /// Runs once per invocation, including after a parse failure or a panic
    /// inside `run`.
    fn post_hook(&self, _ctx: &mut RequestContext) {}
}

/// Call-site parameters a descriptor is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallParams {
    pub skip_first: bool,
}

impl CallParams {
    pub fn defaults_for(descriptor: &CommandDescriptor) -> Self {
        Self {
            skip_first: descriptor.skips_first(),
        }
    }
}

/// What a running command can see and do.
pub struct Call<'a> {
    pub registry: &'a Registry,
    pub ctx: &'a mut RequestContext,
    pub command: &'a str,
    /// Payload after `skip_first` was applied, before the parse strategy.
    pub remainder: &'a str,
}

impl Call<'_> {
    /// Re-enter resolution with a new query, sharing this request's context.
    pub fn execute_nested(&mut self, query: &str) -> Outcome {
        self.registry.dispatch(query, self.ctx)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("missing argument")]
    MissingArgument,
    #[error("{command} is only available from localhost")]
    RestrictedCommandDenied { command: String },
    #[error("{command} is not implemented yet")]
    Unimplemented { command: String },
    #[error("cannot understand query: {0}")]
    Unparseable(String),
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MissingArgument => CommandError::MissingArgument,
            ParseError::UnbalancedQuotes(_) => CommandError::Unparseable(err.to_string()),
        }
    }
}

/// Runs the body's post-hook when dropped, so a panicking body still gets it.
struct PostHookGuard<'a> {
    body: &'a dyn CommandBody,
    ctx: &'a mut RequestContext,
}

impl Drop for PostHookGuard<'_> {
    fn drop(&mut self) {
        self.body.post_hook(self.ctx);
    }
}

impl CommandError {
    fn into_outcome(self, query: &str) -> Outcome {
        match self {
            CommandError::MissingArgument => Outcome::help(Some(query)),
            other => Outcome::Text(other.to_string()),
        }
    }
}

impl Registry {
    /// Entry point for the transport: one call per inbound query.
    pub fn execute_query(&self, full_query: &str, ctx: &mut RequestContext) -> Outcome {
        ctx.full_query = full_query.to_string();
        self.dispatch(full_query, ctx)
    }

    pub(crate) fn dispatch(&self, query: &str, ctx: &mut RequestContext) -> Outcome {
        let resolution = self.resolve(query);
        self.invoke(resolution, ctx)
    }

    pub fn invoke(&self, resolution: Resolution, ctx: &mut RequestContext) -> Outcome {
        let Resolution {
            descriptor,
            query,
            params,
            matched,
        } = resolution;
        let body = descriptor.body();

        ctx.claim_command(descriptor.name());

        let remainder = if params.skip_first {
            split_two(&query).1
        } else {
            query.as_str()
        };
        tracing::debug!(
            command = descriptor.name(),
            matched,
            skip_first = params.skip_first,
            payload = remainder,
            "invoking command"
        );

        let result = {
            let mut guard = PostHookGuard {
                body,
                ctx: &mut *ctx,
            };
            match descriptor.parse_strategy().apply(remainder) {
                Ok(args) => {
                    let mut call = Call {
                        registry: self,
                        ctx: &mut *guard.ctx,
                        command: descriptor.name(),
                        remainder,
                    };
                    body.run(args, &mut call)
                }
                Err(err) => Err(err.into()),
            }
        };

        result.unwrap_or_else(|err| {
            match &err {
                CommandError::RestrictedCommandDenied { .. } => {
                    tracing::warn!(command = descriptor.name(), peer = ?ctx.peer, "{err}")
                }
                _ => tracing::debug!(command = descriptor.name(), "{err}"),
            }
            err.into_outcome(&query)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Call, CommandBody, CommandError};
    use crate::engine::catalog::builtin_registry;
    use crate::engine::context::{Location, Outcome, RequestContext, Route};
    use crate::engine::parsing::{ParseStrategy, Parsed};
    use crate::engine::registry::{CommandDescriptor, Registry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Recorder {
        post_hooks: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CommandBody for Recorder {
        fn run(&self, args: Parsed, _call: &mut Call<'_>) -> Result<Outcome, CommandError> {
            if self.fail {
                return Err(CommandError::Unparseable("recorder".to_string()));
            }
            Ok(Outcome::Text(format!("{args:?}")))
        }

        fn post_hook(&self, _ctx: &mut RequestContext) {
            self.post_hooks.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Exploding {
        post_hooks: Arc<AtomicUsize>,
    }

    impl CommandBody for Exploding {
        fn run(&self, _args: Parsed, _call: &mut Call<'_>) -> Result<Outcome, CommandError> {
            panic!("body blew up");
        }

        fn post_hook(&self, _ctx: &mut RequestContext) {
            self.post_hooks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn recorder_registry(strategy: ParseStrategy, fail: bool) -> (Registry, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        registry
            .register(
                CommandDescriptor::new(
                    "recorder",
                    Recorder {
                        post_hooks: counter.clone(),
                        fail,
                    },
                )
                .aliases(&["p"])
                .strategy(strategy),
            )
            .unwrap();
        (registry, counter)
    }

    fn external(outcome: &Outcome) -> &str {
        match outcome {
            Outcome::Redirect(Location::External(url)) => url,
            other => panic!("expected external redirect, got {other:?}"),
        }
    }

    #[test]
    fn post_hook_runs_once_on_success() {
        let (registry, counter) = recorder_registry(ParseStrategy::WhitespaceSplit, false);
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("p a b", &mut ctx);
        assert_eq!(out, Outcome::Text(r#"Words(["a", "b"])"#.to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn post_hook_runs_once_on_command_failure() {
        let (registry, counter) = recorder_registry(ParseStrategy::Raw, true);
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("p x", &mut ctx);
        assert_eq!(
            out,
            Outcome::Text("cannot understand query: recorder".to_string())
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn post_hook_runs_once_when_body_panics() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        registry
            .register(
                CommandDescriptor::new(
                    "boom",
                    Exploding {
                        post_hooks: counter.clone(),
                    },
                )
                .aliases(&["boom"]),
            )
            .unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut ctx = RequestContext::default();
            registry.execute_query("boom now", &mut ctx)
        }));
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_argument_becomes_help_redirect() {
        let (registry, counter) = recorder_registry(ParseStrategy::TwoTokenSplit, false);
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("p", &mut ctx);
        assert_eq!(
            out,
            Outcome::Redirect(Location::Internal {
                route: Route::Help,
                query: Some("p".to_string())
            })
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("recorder"));
    }

    #[test]
    fn pre_hook_records_name_and_full_query() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        registry.execute_query("ddg rust borrowck", &mut ctx);
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("duckduckgo"));
        assert_eq!(ctx.full_query, "ddg rust borrowck");
        assert!(ctx.should_record());
    }

    #[test]
    fn google_strips_its_own_token() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("google cats", &mut ctx);
        assert_eq!(external(&out), "https://www.google.com/search?q=cats");
    }

    #[test]
    fn fallback_keeps_unmatched_token() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("zzzznotacommand foo bar", &mut ctx);
        assert_eq!(
            external(&out),
            "https://www.google.com/search?q=zzzznotacommand%20foo%20bar"
        );
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("google"));
    }

    #[test]
    fn dnt_delegates_and_keeps_its_name() {
        let registry = builtin_registry().unwrap();

        let mut direct = RequestContext::default();
        let expected = registry.execute_query("google cats", &mut direct);

        let mut ctx = RequestContext::default();
        let out = registry.execute_query("dnt google cats", &mut ctx);
        assert_eq!(out, expected);
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("dnt"));
        assert_eq!(ctx.full_query, "dnt google cats");
        assert!(!ctx.should_record());
    }

    #[test]
    fn nested_dnt_terminates() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("dnt dnt dnt g cats", &mut ctx);
        assert_eq!(external(&out), "https://www.google.com/search?q=cats");
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("dnt"));
    }

    #[test]
    fn bare_dnt_redirects_to_help() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        let out = registry.execute_query("dnt", &mut ctx);
        assert_eq!(out, Outcome::help(Some("dnt")));
        assert!(!ctx.should_record());
    }

    #[test]
    fn empty_query_lists_commands() {
        let registry = builtin_registry().unwrap();
        let mut ctx = RequestContext::default();
        let Outcome::Text(body) = registry.execute_query("", &mut ctx) else {
            panic!("expected listing text");
        };
        assert!(body.contains("google"));
        assert_eq!(ctx.resolved_command_name.as_deref(), Some("help"));
    }
}
