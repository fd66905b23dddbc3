//! Wire types for transaction records

use serde::{Deserialize, Serialize};

/// One transaction as delivered by the transactions service
///
/// Unknown fields (ids, version keys) are ignored. Only `username` is
/// required; everything else degrades to an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub username: String,
    #[serde(default)]
    pub amount: Option<Scalar>,
    #[serde(default)]
    pub time: Option<Scalar>,
    #[serde(rename = "createDate", default)]
    pub create_date: RawTimestamp,
}

impl TransactionRecord {
    pub fn new(username: impl Into<String>, create_date: impl Into<RawTimestamp>) -> Self {
        Self {
            username: username.into(),
            amount: None,
            time: None,
            create_date: create_date.into(),
        }
    }

    pub fn with_amount(mut self, amount: impl Into<Scalar>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Amount as shown in the table, empty when absent
    pub fn amount_display(&self) -> String {
        self.amount.as_ref().map(|a| a.to_string()).unwrap_or_default()
    }

    /// Time as shown in the table, empty when absent
    pub fn time_display(&self) -> String {
        self.time.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// A display value that may arrive as a JSON number or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::Text(n.to_string()))
    }
}

/// Unparsed `createDate` value
///
/// Anything that is neither a string nor whole epoch milliseconds lands in
/// `Other`, so one odd record never rejects the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
    /// Fractional millis, null, booleans, objects
    Other(serde_json::Value),
}

impl Default for RawTimestamp {
    fn default() -> Self {
        RawTimestamp::Text(String::new())
    }
}

impl std::fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTimestamp::Millis(ms) => write!(f, "{}", ms),
            RawTimestamp::Text(s) => write!(f, "{}", s),
            RawTimestamp::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(s: &str) -> Self {
        RawTimestamp::Text(s.to_string())
    }
}

impl From<String> for RawTimestamp {
    fn from(s: String) -> Self {
        RawTimestamp::Text(s)
    }
}

impl From<i64> for RawTimestamp {
    fn from(ms: i64) -> Self {
        RawTimestamp::Millis(ms)
    }
}
