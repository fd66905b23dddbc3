//! Core transaction table logic
//!
//! - filter: username search over the loaded records
//! - elapsed: time pipe gap between two records
//! - view: composition of the table (rows, deltas, column layout)
//! - store: the latest snapshot fetched from the data source

pub mod elapsed;
pub mod error;
pub mod filter;
pub mod store;
pub mod timestamp;
pub mod view;

pub use elapsed::{elapsed, elapsed_between, Elapsed};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorLogger, ErrorSeverity};
pub use filter::{filter, SearchTerm};
pub use store::{Snapshot, TransactionStore};
pub use timestamp::{parse_timestamp, DateDisplay, INVALID_DATE};
pub use view::{compose, ColumnLayout, DeltaCell, Placeholder, TableRow, TableView, NOT_APPLICABLE, PLACEHOLDER_TEXT};

pub use timepipe_source::{RawTimestamp, Scalar, TransactionRecord};
