//! Transaction routes - table, username search, time pipe deltas
//!
//! Structure:
//! - api.rs: JSON view and the HTMX table partial
//! - page.rs: Full page and table rendering

pub mod api;
pub mod page;

pub use api::{api_transactions, htmx_transactions_table};
pub use page::{page_transactions, render_table, search_url};
