//! Error types for timepipe-source

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Malformed transaction list: {message}")]
    Decode { message: String },
}

impl From<hyper::Error> for SourceError {
    fn from(e: hyper::Error) -> Self {
        SourceError::Http { message: e.to_string() }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode { message: e.to_string() }
    }
}
