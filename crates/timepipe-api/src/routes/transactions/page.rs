//! Transactions page rendering
//!
//! - page_transactions: heading, search box and the initial table
//! - render_table: the table markup shared with the HTMX partial

use crate::{page_response, AppState};
use axum::extract::Query;
use std::collections::HashMap;
use timepipe_core::{compose, DateDisplay, Snapshot, TableRow, TableView};
use timepipe_utils::escape_html;

/// Transactions page - search input plus the table for the current term
pub async fn page_transactions(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let query = params.get("q").map(|s| s.as_str()).unwrap_or("");
    let snapshot = state.store.snapshot();
    let dates = DateDisplay::from(&state.config.display);
    let view = compose(&snapshot.records, query, &dates);
    let title = &state.config.display.title;

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h1 class='text-2xl font-bold'>{}</h1>
            <button hx-post='/api/reload' hx-swap='none' hx-on::after-request='window.location.reload()'
                class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200' title='Fetch transactions again'>
                Reload
            </button>
        </div>
        {}
        <input type='search' name='q' value='{}' placeholder='Search by username' autocomplete='off'
            hx-get='/transactions/table' hx-trigger='input, search' hx-target='#transactions-table' hx-swap='innerHTML'
            class='mb-4 px-4 py-2 border rounded-lg w-full md:w-80'>
        <div id='transactions-table' class='bg-white rounded-xl shadow-sm overflow-x-auto'>{}</div>"#,
        escape_html(title),
        fetch_notice(&snapshot),
        escape_html(query),
        render_table(&view)
    );

    axum::response::Html(page_response(&headers, title, &inner_content))
}

/// Address of the page for a search term, swapped into the address bar
/// without adding a history entry per keystroke
pub fn search_url(term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        "/transactions".to_string()
    } else {
        format!("/transactions?q={}", urlencoding::encode(term))
    }
}

/// Shown above the table when the last fetch failed
fn fetch_notice(snapshot: &Snapshot) -> String {
    match &snapshot.last_error {
        Some(error) => format!(
            r#"<div class='mb-4 p-3 rounded-lg bg-red-50 border border-red-200 text-sm text-red-700'>Could not load transactions: {}</div>"#,
            escape_html(error)
        ),
        None => String::new(),
    }
}

/// Table markup for a composed view
pub fn render_table(view: &TableView<'_>) -> String {
    let header_cells: String = view
        .layout()
        .headers()
        .iter()
        .map(|h| format!("<th class='px-4 py-2 border text-left text-sm font-semibold'>{}</th>", h))
        .collect();

    let body = match view.placeholder() {
        Some(placeholder) => format!(
            "<tr><td colspan='{}' class='px-4 py-6 border text-center text-gray-500'>{}</td></tr>",
            placeholder.colspan, placeholder.message
        ),
        None => view.rows().iter().map(render_row).collect(),
    };

    format!(
        r#"<table class='min-w-full border-collapse'>
    <thead class='bg-gray-100'><tr>{}</tr></thead>
    <tbody>{}</tbody>
</table>"#,
        header_cells, body
    )
}

fn render_row(row: &TableRow<'_>) -> String {
    let stripe = if row.is_even() { "bg-gray-50" } else { "bg-white" };

    let delta_cell = match &row.delta {
        Some(delta) if delta.is_invalid() => format!(
            "<td class='px-4 py-2 border font-mono text-gray-400' title='Unparseable createDate'>{}</td>",
            delta.display()
        ),
        Some(delta) => format!("<td class='px-4 py-2 border font-mono'>{}</td>", delta.display()),
        None => String::new(),
    };

    format!(
        "<tr class='{}'><td class='px-4 py-2 border'>{}</td><td class='px-4 py-2 border'>{}</td><td class='px-4 py-2 border'>{}</td><td class='px-4 py-2 border'>{}</td>{}</tr>",
        stripe,
        escape_html(&row.record.username),
        escape_html(&row.record.amount_display()),
        escape_html(&row.record.time_display()),
        escape_html(&row.created),
        delta_cell
    )
}
