use crate::domain::models::{ErrorBody, JsonErr, JsonOut};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn emit_one<T: Serialize>(
    json: bool,
    data: T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return print_json(&JsonOut { ok: true, data });
    }
    println!("{}", text(&data));
    Ok(())
}

/// JSON errors go to stdout so callers parse one stream; text errors to stderr.
pub fn emit_error(json: bool, code: &str, message: &str) {
    if json {
        let body = JsonErr {
            ok: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        if let Ok(s) = serde_json::to_string_pretty(&body) {
            println!("{s}");
            return;
        }
    }
    eprintln!("error: {message}");
}
