//! HTTP transport: `GET /?q=` runs a query, `/help` and `/history` render text.

use crate::engine::catalog::listing_lines;
use crate::engine::context::{Outcome, RequestContext};
use crate::engine::registry::Registry;
use crate::services::history::{render_history, HistoryStore};
use crate::services::redirect::href;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub history: Option<Arc<HistoryStore>>,
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    #[serde(default)]
    q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(run_query))
        .route("/help", get(help_page))
        .route("/history", get(history_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn into_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Redirect(location) => {
            (StatusCode::FOUND, [(header::LOCATION, href(&location))]).into_response()
        }
        Outcome::Text(body) => body.into_response(),
    }
}

async fn run_query(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<QueryParams>,
) -> Response {
    let mut ctx = RequestContext::new(Some(peer));
    let outcome = state.registry.execute_query(&params.q, &mut ctx);
    let response = into_response(outcome);

    // History is written after the response is built and never awaited.
    if let Some(store) = state.history.clone() {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = store.record(&ctx) {
                warn!(error = %e, "failed to record history");
            }
        });
    }
    response
}

async fn help_page(State(state): State<AppState>, Query(params): Query<QueryParams>) -> String {
    let topic = params.q.split_whitespace().next();
    listing_lines(&state.registry, topic).join("\n")
}

async fn history_page(State(state): State<AppState>) -> Response {
    let Some(store) = state.history.clone() else {
        return "history is disabled".into_response();
    };
    match tokio::task::spawn_blocking(move || store.load()).await {
        Ok(Ok(entries)) => render_history(&entries).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "failed to load history");
            (StatusCode::INTERNAL_SERVER_ERROR, "history unavailable").into_response()
        }
        Err(e) => {
            warn!(error = %e, "history task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "history unavailable").into_response()
        }
    }
}
