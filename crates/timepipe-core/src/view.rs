//! Composition of the transactions table
//!
//! [`compose`] is a pure function of the loaded records and the search
//! term. Callers run it again whenever either changes; nothing here keeps
//! state between calls.
//!
//! Header width and the empty-state placeholder span both come from one
//! [`ColumnLayout`], so they cannot disagree.

use crate::elapsed::{elapsed_between, Elapsed};
use crate::error::CoreError;
use crate::filter::{filter, SearchTerm};
use crate::timestamp::DateDisplay;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use timepipe_source::TransactionRecord;

/// Marker for a delta cell that has no value
pub const NOT_APPLICABLE: &str = "--";

/// Empty-state message
pub const PLACEHOLDER_TEXT: &str = "No transactions available";

const BASE_HEADERS: [&str; 4] = ["Username", "Amount", "Time", "Created Date"];
const TIME_PIPE_HEADER: &str = "Time Pipe Result";

/// Which columns the table has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    /// Username, Amount, Time, Created Date
    Base,
    /// Base columns plus Time Pipe Result
    WithTimePipe,
}

impl ColumnLayout {
    /// The time pipe column shows only for an active filter with matches
    pub fn for_filter(term: &SearchTerm, visible_len: usize) -> Self {
        if !term.is_empty() && visible_len > 0 {
            ColumnLayout::WithTimePipe
        } else {
            ColumnLayout::Base
        }
    }

    pub fn shows_time_pipe(self) -> bool {
        self == ColumnLayout::WithTimePipe
    }

    pub fn column_count(self) -> usize {
        self.headers().len()
    }

    pub fn headers(self) -> Vec<&'static str> {
        let mut headers = BASE_HEADERS.to_vec();
        if self.shows_time_pipe() {
            headers.push(TIME_PIPE_HEADER);
        }
        headers
    }
}

/// Content of a time pipe cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeltaCell {
    /// Gap to the next visible row
    Elapsed { value: Elapsed },
    /// Last visible row, there is no successor
    NotApplicable,
    /// One of the two createDate values did not parse
    Invalid { value: String },
}

impl DeltaCell {
    /// Text for the cell
    pub fn display(&self) -> String {
        match self {
            DeltaCell::Elapsed { value } => value.to_string(),
            DeltaCell::NotApplicable | DeltaCell::Invalid { .. } => NOT_APPLICABLE.to_string(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DeltaCell::Invalid { .. })
    }
}

/// One visible transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow<'a> {
    /// Position within the visible rows
    pub index: usize,
    pub record: &'a TransactionRecord,
    /// Created date formatted for display
    pub created: String,
    /// Absent when the time pipe column is hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<DeltaCell>,
}

impl TableRow<'_> {
    /// Even rows get the shaded background
    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }
}

/// Single row rendered in place of transactions when none are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub colspan: usize,
    pub message: &'static str,
}

/// Everything the presentation layer needs to draw the table
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    term: SearchTerm,
    layout: ColumnLayout,
    rows: Vec<TableRow<'a>>,
}

impl<'a> TableView<'a> {
    pub fn term(&self) -> &str {
        self.term.as_str()
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn show_delta_column(&self) -> bool {
        self.layout.shows_time_pipe()
    }

    pub fn rows(&self) -> &[TableRow<'a>] {
        &self.rows
    }

    /// The visible records, in source order
    pub fn visible(&self) -> impl Iterator<Item = &'a TransactionRecord> + '_ {
        self.rows.iter().map(|row| row.record)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Present only when there are no visible rows
    pub fn placeholder(&self) -> Option<Placeholder> {
        self.rows.is_empty().then(|| Placeholder {
            colspan: self.layout.column_count(),
            message: PLACEHOLDER_TEXT,
        })
    }
}

impl Serialize for TableView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableView", 6)?;
        state.serialize_field("term", self.term())?;
        state.serialize_field("show_delta_column", &self.show_delta_column())?;
        state.serialize_field("column_count", &self.layout.column_count())?;
        state.serialize_field("headers", &self.layout.headers())?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("placeholder", &self.placeholder())?;
        state.end()
    }
}

/// Filter `records` by `term` and attach time pipe deltas
pub fn compose<'a>(records: &'a [TransactionRecord], term: &str, dates: &DateDisplay) -> TableView<'a> {
    let term = SearchTerm::new(term);
    let visible = filter(records, &term);
    let layout = ColumnLayout::for_filter(&term, visible.len());

    let rows = visible
        .iter()
        .copied()
        .enumerate()
        .map(|(index, record)| TableRow {
            index,
            record,
            created: dates.render(&record.create_date),
            delta: layout
                .shows_time_pipe()
                .then(|| delta_to_next(record, visible.get(index + 1).copied())),
        })
        .collect();

    TableView { term, layout, rows }
}

fn delta_to_next(current: &TransactionRecord, next: Option<&TransactionRecord>) -> DeltaCell {
    let Some(next) = next else {
        return DeltaCell::NotApplicable;
    };

    match elapsed_between(&current.create_date, &next.create_date) {
        Ok(value) => DeltaCell::Elapsed { value },
        Err(e) => {
            log::debug!("Time pipe for {} degraded: {}", current.username, e);
            let value = match e {
                CoreError::InvalidTimestamp { value } => value,
                other => other.to_string(),
            };
            DeltaCell::Invalid { value }
        }
    }
}
