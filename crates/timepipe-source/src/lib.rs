//! Transaction data sources
//!
//! A source hands back a complete snapshot of transaction records each
//! time it is asked. Nothing is cached or merged here; the caller owns
//! the snapshot.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use timepipe_config::{SourceConfig, SourceKind};

pub mod error;
pub mod file;
pub mod http;
pub mod types;

pub use error::SourceError;
pub use file::FileSource;
pub use http::HttpSource;
pub use types::{RawTimestamp, Scalar, TransactionRecord};

// ==================== Source Trait ====================

/// Source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Something that can supply the full, ordered list of transactions
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Short description used in logs and error reports
    fn describe(&self) -> String;

    /// Fetch a fresh snapshot
    async fn fetch(&self) -> Result<Vec<TransactionRecord>, SourceError>;
}

/// Decode a JSON array of transaction records
pub fn decode_records(body: &[u8]) -> Result<Vec<TransactionRecord>, SourceError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Err(SourceError::Decode {
            message: format!("expected a JSON array, got {}", json_kind(&value)),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Build the source described by the configuration
pub fn source_from_config(config: &SourceConfig) -> SourceRef {
    match config.kind {
        SourceKind::Http => Arc::new(HttpSource::new(
            config.transactions_url(),
            Duration::from_secs(config.timeout_secs),
        )),
        SourceKind::File => Arc::new(FileSource::new(config.file_path.clone())),
    }
}

// ==================== In-memory Source ====================

/// Fixed set of records, handy for demos and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<TransactionRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl TransactionSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    async fn fetch(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timepipe_config::Environment;

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"[
            {"username": "alice", "amount": 1, "time": "a", "createDate": "2024-01-01T00:00:00Z"},
            {"username": "bob", "amount": 2, "time": "b", "createDate": "2024-01-01T02:30:15Z"}
        ]"#;
        let records = decode_records(body).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_decode_keeps_rows_with_odd_create_dates() {
        let body = br#"[
            {"username": "alice", "createDate": "2024-01-01T00:00:00Z"},
            {"username": "bob", "createDate": null},
            {"username": "carol", "createDate": 1704067200000.0},
            {"username": "dave", "createDate": false}
        ]"#;
        let records = decode_records(body).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].create_date, RawTimestamp::from("2024-01-01T00:00:00Z"));
        assert!(matches!(records[1].create_date, RawTimestamp::Other(_)));
        assert_eq!(records[3].username, "dave");
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode_records(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        match decode_records(br#"{"transactions": []}"#) {
            Err(SourceError::Decode { message }) => assert!(message.contains("an object")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_records(b"<html>"),
            Err(SourceError::Decode { .. })
        ));
    }

    #[test]
    fn test_source_from_config() {
        let config = SourceConfig {
            environment: Environment::Development,
            local_url: "http://localhost:5000".to_string(),
            ..SourceConfig::default()
        };
        let source = source_from_config(&config);
        assert!(source.describe().contains("http://localhost:5000/api/transactions/list"));

        let config = SourceConfig {
            kind: SourceKind::File,
            file_path: "fixtures/tx.json".into(),
            ..SourceConfig::default()
        };
        let source = source_from_config(&config);
        assert!(source.describe().contains("fixtures/tx.json"));
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new(vec![TransactionRecord::new("alice", "2024-01-01")]);
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.describe(), "memory (1 records)");
    }
}
