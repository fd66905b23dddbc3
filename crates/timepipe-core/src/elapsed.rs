//! Elapsed wall-clock time between two records

use crate::error::CoreResult;
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use timepipe_source::RawTimestamp;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Absolute gap between two instants, displayed as `HH:MM:SS`
///
/// Hours keep counting past 23; a 30 hour gap is `30:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Elapsed {
    millis: u64,
}

impl Elapsed {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn hours(&self) -> u64 {
        self.millis / MILLIS_PER_HOUR
    }

    pub fn minutes(&self) -> u64 {
        (self.millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE
    }

    pub fn seconds(&self) -> u64 {
        (self.millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND
    }
}

impl std::fmt::Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours(), self.minutes(), self.seconds())
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Gap between two instants, independent of their order
pub fn elapsed(a: DateTime<Utc>, b: DateTime<Utc>) -> Elapsed {
    Elapsed::from_millis((b - a).num_milliseconds().unsigned_abs())
}

/// Gap between two raw `createDate` values
///
/// Fails with `InvalidTimestamp` naming the first value that does not parse.
pub fn elapsed_between(a: &RawTimestamp, b: &RawTimestamp) -> CoreResult<Elapsed> {
    Ok(elapsed(parse_timestamp(a)?, parse_timestamp(b)?))
}
