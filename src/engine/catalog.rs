//! Built-in commands and the startup registration list.

use super::calendar::Calendar;
use super::context::{Location, Outcome, Route};
use super::invoke::{Call, CommandBody, CommandError};
use super::parsing::{ParseStrategy, Parsed};
use super::registry::{CommandDescriptor, Registry, RegistryError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone when encoding a payload: unreserved plus `/`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

pub fn quote(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Registers every built-in command in a fixed order.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    let help = registry.help();
    registry.register(help)?;
    registry.register(
        CommandDescriptor::new("list", List)
            .describe("List commands and their aliases")
            .aliases(&["list", "l"]),
    )?;
    registry.register(
        CommandDescriptor::new("history", HistoryLink)
            .describe("Show previously executed commands")
            .aliases(&["history", "hist"]),
    )?;
    registry.register(
        CommandDescriptor::new("dnt", DoNotTrack)
            .describe("Run the rest of the query without recording it")
            .aliases(&["dnt"])
            .strategy(ParseStrategy::TwoTokenSplit),
    )?;
    registry.register(
        search("google", "https://www.google.com/search", "q")
            .describe("Search Google")
            .aliases(&["g", "go", "goo", "goog", "googl", "google"])
            .default_command(),
    )?;
    registry.register(
        search("duckduckgo", "https://duckduckgo.com/", "q")
            .describe("Search DuckDuckGo")
            .aliases(&["duckduckgo", "ddg", "dd"]),
    )?;
    registry.register(
        search("youtube", "https://www.youtube.com/results", "search_query")
            .describe("Search YouTube")
            .aliases(&["youtube", "yt"]),
    )?;
    registry.register(
        search("wolfram", "https://www.wolframalpha.com/input/", "i")
            .describe("Ask Wolfram|Alpha")
            .aliases(&["wolfram", "wa"]),
    )?;
    registry.register(
        CommandDescriptor::new("calendar", Calendar::new())
            .describe("Print a month or year calendar")
            .aliases(&["cal", "calendar"])
            .strategy(ParseStrategy::WhitespaceSplit),
    )?;
    registry.register(
        CommandDescriptor::new("shell", Shell)
            .describe("Run a shell command (localhost only, not available yet)")
            .strategy(ParseStrategy::ShellLexical),
    )?;
    tracing::debug!(commands = registry.len(), "registry populated");
    Ok(registry)
}

pub(crate) fn help_descriptor() -> CommandDescriptor {
    CommandDescriptor::new("help", Help)
        .describe("Show available commands")
        .aliases(&["help", "h", "he", "hel"])
        .strategy(ParseStrategy::WhitespaceSplit)
}

fn search(name: &str, base_url: &str, query_key: &str) -> CommandDescriptor {
    CommandDescriptor::new(name, SearchRedirect::new(base_url, query_key))
        .strategy(ParseStrategy::WhitespaceSplit)
}

/// Aligned `name  aliases  description` rows, optionally narrowed to the
/// command a topic names.
pub fn listing_lines(registry: &Registry, topic: Option<&str>) -> Vec<String> {
    let mut rows = registry.all_descriptors_with_aliases();
    if let Some(topic) = topic.map(str::to_lowercase) {
        let narrowed: Vec<_> = rows
            .iter()
            .filter(|(d, aliases)| d.name() == topic || aliases.contains(&topic))
            .cloned()
            .collect();
        if !narrowed.is_empty() {
            rows = narrowed;
        }
    }

    let rows: Vec<(String, String, String)> = rows
        .into_iter()
        .map(|(d, aliases)| {
            let mut description = d.description().to_string();
            if registry
                .default_descriptor()
                .map(|def| def.name() == d.name())
                .unwrap_or(false)
            {
                description.push_str(" (default)");
            }
            let aliases = if aliases.is_empty() {
                "-".to_string()
            } else {
                aliases.join(", ")
            };
            (d.name().to_string(), aliases, description)
        })
        .collect();

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let alias_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(name, aliases, description)| {
            format!(
                "{:<nw$}  {:<aw$}  {}",
                name,
                aliases,
                description,
                nw = name_width,
                aw = alias_width
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

pub struct Help;

impl CommandBody for Help {
    fn run(&self, args: Parsed, call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        let words = args.into_words();
        let lines = listing_lines(call.registry, words.first().map(String::as_str));
        Ok(Outcome::Text(lines.join("\n")))
    }
}

pub struct List;

impl CommandBody for List {
    fn run(&self, _args: Parsed, call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        Ok(Outcome::Text(listing_lines(call.registry, None).join("\n")))
    }
}

/// Rendering happens on the history route, next to the store.
pub struct HistoryLink;

impl CommandBody for HistoryLink {
    fn run(&self, _args: Parsed, _call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        Ok(Outcome::Redirect(Location::Internal {
            route: Route::History,
            query: None,
        }))
    }
}

pub struct DoNotTrack;

impl CommandBody for DoNotTrack {
    fn run(&self, _args: Parsed, call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        let inner = call.remainder.to_string();
        Ok(call.execute_nested(&inner))
    }
}

/// Redirects to `{base_url}?{query_key}={payload}`.
#[derive(Debug, Clone)]
pub struct SearchRedirect {
    base_url: String,
    query_key: String,
}

impl SearchRedirect {
    pub fn new(base_url: &str, query_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            query_key: query_key.to_string(),
        }
    }

    pub fn url_for(&self, payload: &str) -> String {
        format!("{}?{}={}", self.base_url, self.query_key, quote(payload))
    }
}

impl CommandBody for SearchRedirect {
    fn run(&self, args: Parsed, _call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        let payload = args.into_words().join(" ");
        Ok(Outcome::Redirect(Location::External(self.url_for(&payload))))
    }
}

/// Never executes anything; the local-only gate is all that exists.
pub struct Shell;

impl CommandBody for Shell {
    fn run(&self, args: Parsed, call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        if !call.ctx.is_local() {
            return Err(CommandError::RestrictedCommandDenied {
                command: call.command.to_string(),
            });
        }
        let argv = args.into_words();
        tracing::debug!(?argv, "shell command requested");
        Err(CommandError::Unimplemented {
            command: call.command.to_string(),
        })
    }
}
