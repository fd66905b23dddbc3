//! Transactions API endpoints - JSON view and HTMX partial responses
//!
//! Endpoints:
//! - api_transactions: composed table view (JSON)
//! - htmx_transactions_table: table for a search term (HTML fragment)

use super::page::{render_table, search_url};
use crate::AppState;
use axum::extract::Query;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use timepipe_core::{compose, DateDisplay, TableView};

#[derive(Serialize)]
struct TransactionsResponse<'a> {
    #[serde(flatten)]
    view: TableView<'a>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<&'a str>,
}

/// Get the table view for `?q=` (JSON API)
pub async fn api_transactions(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("q").map(|s| s.as_str()).unwrap_or("");
    let snapshot = state.store.snapshot();
    let dates = DateDisplay::from(&state.config.display);

    let response = TransactionsResponse {
        view: compose(&snapshot.records, query, &dates),
        loaded_at: snapshot.loaded_at,
        last_error: snapshot.last_error.as_deref(),
    };
    Json(&response).into_response()
}

/// HTMX: table partial, re-requested on every keystroke in the search box
pub async fn htmx_transactions_table(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("q").map(|s| s.as_str()).unwrap_or("");
    let snapshot = state.store.snapshot();
    let dates = DateDisplay::from(&state.config.display);
    let view = compose(&snapshot.records, query, &dates);
    log::debug!("Search {:?}: {} of {} rows", query, view.rows().len(), snapshot.records.len());

    ([("HX-Replace-Url", search_url(query))], Html(render_table(&view))).into_response()
}
