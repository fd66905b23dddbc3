//! Holder of the most recently loaded transactions

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use timepipe_source::{SourceRef, TransactionRecord};

/// One fetch result. Replaced as a whole, never edited.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub records: Vec<TransactionRecord>,
    /// When the fetch that produced this snapshot completed
    pub loaded_at: Option<DateTime<Utc>>,
    /// Set when the fetch failed; `records` is then empty
    pub last_error: Option<String>,
}

impl Snapshot {
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some() && self.last_error.is_none()
    }
}

/// Owns the data source and the current snapshot
pub struct TransactionStore {
    source: SourceRef,
    logger: Arc<dyn ErrorLogger>,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl TransactionStore {
    /// Create an empty store; nothing is fetched until [`load`](Self::load)
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            logger: Arc::new(DefaultErrorLogger),
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Report fetch failures somewhere other than the log
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// The current snapshot. Before the first load this is empty.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Fetch from the source and replace the snapshot
    ///
    /// On failure the snapshot becomes empty and the error is reported to
    /// the logger before being returned.
    pub async fn load(&self) -> CoreResult<usize> {
        let source_name = self.source.describe();
        log::info!("Fetching transactions from {}", source_name);

        let (snapshot, result) = match self.source.fetch().await {
            Ok(records) => {
                let count = records.len();
                log::info!("Loaded {} transactions", count);
                self.report_invalid_dates(&source_name, &records);
                let snapshot = Snapshot {
                    records,
                    loaded_at: Some(Utc::now()),
                    last_error: None,
                };
                (snapshot, Ok(count))
            }
            Err(e) => {
                let error = CoreError::fetch_failure(&source_name, &e);
                let context = ErrorContext::new("fetch_transactions")
                    .with_data("source", serde_json::json!(source_name));
                self.logger.log_error(&error, &context);
                let snapshot = Snapshot {
                    records: Vec::new(),
                    loaded_at: Some(Utc::now()),
                    last_error: Some(error.to_string()),
                };
                (snapshot, Err(error))
            }
        };

        self.replace(snapshot);
        result
    }

    /// Rows with an unparseable createDate still load; their deltas show `--`
    fn report_invalid_dates(&self, source_name: &str, records: &[TransactionRecord]) {
        let invalid: Vec<String> = records
            .iter()
            .filter(|r| parse_timestamp(&r.create_date).is_err())
            .map(|r| r.create_date.to_string())
            .collect();
        if invalid.is_empty() {
            return;
        }

        let context = ErrorContext::new("fetch_transactions")
            .with_data("source", serde_json::json!(source_name))
            .with_data("examples", serde_json::json!(invalid.iter().take(3).collect::<Vec<_>>()));
        self.logger.log_warning(
            &format!("{} of {} records have an unparseable createDate", invalid.len(), records.len()),
            &context,
        );
    }

    fn replace(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use timepipe_source::{MemorySource, RawTimestamp, SourceError, TransactionSource};

    /// Succeeds or fails depending on a switch
    struct FlakySource {
        fail: AtomicBool,
        records: Vec<TransactionRecord>,
    }

    #[async_trait]
    impl TransactionSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        async fn fetch(&self) -> Result<Vec<TransactionRecord>, SourceError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(SourceError::Http { message: "connection refused".to_string() })
            } else {
                Ok(self.records.clone())
            }
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<ErrorCode>>,
        warnings: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, error: &CoreError, _context: &ErrorContext) {
            self.errors.lock().unwrap().push(error.code());
        }

        fn log_warning(&self, message: &str, context: &ErrorContext) {
            self.warnings
                .lock()
                .unwrap()
                .push((message.to_string(), context.data.clone()));
        }
    }

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("alice", "2024-01-01T00:00:00Z"),
            TransactionRecord::new("bob", "2024-01-01T02:30:15Z"),
        ]
    }

    #[tokio::test]
    async fn test_empty_before_first_load() {
        let store = TransactionStore::new(Arc::new(MemorySource::new(records())));
        let snapshot = store.snapshot();
        assert!(snapshot.records.is_empty());
        assert!(!snapshot.is_loaded());
    }

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let store = TransactionStore::new(Arc::new(MemorySource::new(records())));
        assert_eq!(store.load().await.unwrap(), 2);

        let snapshot = store.snapshot();
        assert!(snapshot.is_loaded());
        assert_eq!(snapshot.records[1].username, "bob");

        // a second load does not append
        store.load().await.unwrap();
        assert_eq!(store.snapshot().records.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_empties_snapshot_and_reports() {
        let source = Arc::new(FlakySource {
            fail: AtomicBool::new(false),
            records: records(),
        });
        let logger = Arc::new(RecordingLogger::default());
        let store = TransactionStore::new(source.clone()).with_logger(logger.clone());

        store.load().await.unwrap();
        let before = store.snapshot();
        assert_eq!(before.records.len(), 2);

        source.fail.store(true, Ordering::SeqCst);
        let err = store.load().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FetchFailure);

        let after = store.snapshot();
        assert!(after.records.is_empty());
        assert!(after.last_error.as_deref().unwrap().contains("connection refused"));
        assert!(!after.is_loaded());
        assert_eq!(*logger.errors.lock().unwrap(), vec![ErrorCode::FetchFailure]);

        // readers holding the old snapshot keep a consistent view
        assert_eq!(before.records.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_dates_load_with_one_warning() {
        let records = vec![
            TransactionRecord::new("alice", "2024-01-01T00:00:00Z"),
            TransactionRecord::new("bob", "yesterday"),
            TransactionRecord::new("carol", RawTimestamp::Other(serde_json::Value::Null)),
        ];
        let logger = Arc::new(RecordingLogger::default());
        let store = TransactionStore::new(Arc::new(MemorySource::new(records)))
            .with_logger(logger.clone());

        assert_eq!(store.load().await.unwrap(), 3);
        assert!(store.snapshot().is_loaded());

        let warnings = logger.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].0.starts_with("2 of 3 records"));
        assert_eq!(warnings[0].1["examples"], serde_json::json!(["yesterday", "null"]));
        assert!(logger.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clean_load_has_no_warnings() {
        let logger = Arc::new(RecordingLogger::default());
        let store = TransactionStore::new(Arc::new(MemorySource::new(records())))
            .with_logger(logger.clone());
        store.load().await.unwrap();
        assert!(logger.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recovers_after_failure() {
        let source = Arc::new(FlakySource {
            fail: AtomicBool::new(true),
            records: records(),
        });
        let store = TransactionStore::new(source.clone())
            .with_logger(Arc::new(RecordingLogger::default()));

        assert!(store.load().await.is_err());
        source.fail.store(false, Ordering::SeqCst);
        assert_eq!(store.load().await.unwrap(), 2);
        assert!(store.snapshot().last_error.is_none());
    }
}
