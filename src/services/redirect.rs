use crate::engine::catalog::quote;
use crate::engine::context::Location;

/// Relative URL for internal routes, absolute for external ones.
pub fn href(location: &Location) -> String {
    match location {
        Location::External(url) => url.clone(),
        Location::Internal { route, query } => match query {
            Some(q) => format!("{}?q={}", route.path(), quote(q)),
            None => route.path().to_string(),
        },
    }
}
