//! JSON file source

use crate::{decode_records, SourceError, TransactionRecord, TransactionSource};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads a JSON array of records from disk on every fetch
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TransactionSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        let content = tokio::fs::read(&self.path).await?;
        let records = decode_records(&content)?;
        log::debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("timepipe-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_records() {
        let path = scratch_file(
            "reads",
            r#"[{"username": "alice", "createDate": "2024-01-01T00:00:00Z"}]"#,
        );
        let records = FileSource::new(path.clone()).fetch().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "alice");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileSource::new(PathBuf::from("/nonexistent/timepipe/transactions.json"));
        assert!(matches!(source.fetch().await, Err(SourceError::IoError(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_decode_error() {
        let path = scratch_file("malformed", "not json");
        let result = FileSource::new(path.clone()).fetch().await;
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SourceError::Decode { .. })));
    }
}
