//! Parsing and display of `createDate` values

use crate::error::CoreError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;
use timepipe_config::DisplayConfig;
use timepipe_source::RawTimestamp;

/// Shown in the Created Date column when the value cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Date-times without an offset, read in the server's local zone
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a raw `createDate` into an absolute instant
pub fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, CoreError> {
    let parsed = match raw {
        RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        RawTimestamp::Text(text) => parse_text(text.trim()),
        RawTimestamp::Other(serde_json::Value::Number(n)) => n
            .as_f64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms.trunc() as i64).single()),
        RawTimestamp::Other(_) => None,
    };

    parsed.ok_or_else(|| CoreError::InvalidTimestamp {
        value: raw.to_string(),
    })
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // RFC 3339 without the colon in the offset, e.g. +0800
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(from_local(naive));
        }
    }

    // date-only values are UTC midnight
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_local(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // skipped by a DST jump
        None => naive.and_utc(),
    }
}

/// Formats created dates for the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDisplay {
    format: String,
    local_time: bool,
}

impl Default for DateDisplay {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DateDisplay {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            format: config.date_format.clone(),
            local_time: config.local_time,
        }
    }
}

impl DateDisplay {
    pub fn new(format: impl Into<String>, local_time: bool) -> Self {
        Self {
            format: format.into(),
            local_time,
        }
    }

    /// Display string for a raw value, [`INVALID_DATE`] when unparseable
    pub fn render(&self, raw: &RawTimestamp) -> String {
        match parse_timestamp(raw) {
            Ok(instant) => self.render_instant(instant),
            Err(_) => INVALID_DATE.to_string(),
        }
    }

    pub fn render_instant(&self, instant: DateTime<Utc>) -> String {
        let mut out = String::new();
        // A bad strftime pattern surfaces as fmt::Error; fall back to RFC 3339
        let written = if self.local_time {
            write!(out, "{}", instant.with_timezone(&Local).format(&self.format))
        } else {
            write!(out, "{}", instant.format(&self.format))
        };

        match written {
            Ok(()) => out,
            Err(_) => {
                log::warn!("Invalid date format {:?}, using RFC 3339", self.format);
                instant.to_rfc3339()
            }
        }
    }
}
