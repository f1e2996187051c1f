//! Parsing strategies applied to the query payload before a command runs.
//!
//! Every strategy is a pure function of the payload string. A descriptor
//! names its strategy; the lifecycle in `invoke.rs` applies it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    Raw,
    WhitespaceSplit,
    ShellLexical,
    TwoTokenSplit,
}

/// Argument form handed to a command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Raw(String),
    Words(Vec<String>),
    Split { head: String, rest: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing argument")]
    MissingArgument,
    #[error("unbalanced quoting in {0:?}")]
    UnbalancedQuotes(String),
}

/// Split off the first whitespace-delimited token.
///
/// The rest is returned verbatim apart from the whitespace run that
/// separated it from the head.
pub fn split_two(input: &str) -> (&str, &str) {
    let trimmed = input.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => {
            let (head, tail) = trimmed.split_at(idx);
            (head, tail.trim_start())
        }
        None => (trimmed, ""),
    }
}

pub fn split_words(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

pub fn split_shell(input: &str) -> Result<Vec<String>, ParseError> {
    shlex::split(input).ok_or_else(|| ParseError::UnbalancedQuotes(input.to_string()))
}

impl ParseStrategy {
    pub fn apply(self, payload: &str) -> Result<Parsed, ParseError> {
        match self {
            ParseStrategy::Raw => Ok(Parsed::Raw(payload.to_string())),
            ParseStrategy::WhitespaceSplit => Ok(Parsed::Words(split_words(payload))),
            ParseStrategy::ShellLexical => split_shell(payload).map(Parsed::Words),
            ParseStrategy::TwoTokenSplit => {
                let (head, rest) = split_two(payload);
                if head.is_empty() {
                    return Err(ParseError::MissingArgument);
                }
                Ok(Parsed::Split {
                    head: head.to_string(),
                    rest: rest.to_string(),
                })
            }
        }
    }
}

impl Parsed {
    /// Flatten back into whitespace-separated words.
    pub fn into_words(self) -> Vec<String> {
        match self {
            Parsed::Raw(raw) => split_words(&raw),
            Parsed::Words(words) => words,
            Parsed::Split { head, rest } => {
                let mut words = vec![head];
                words.extend(split_words(&rest));
                words
            }
        }
    }
}
