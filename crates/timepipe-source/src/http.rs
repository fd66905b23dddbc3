//! HTTP source for the remote transactions service

use crate::{decode_records, SourceError, TransactionRecord, TransactionSource};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Request, Uri};
use std::time::Duration;

/// GETs the transactions list endpoint and decodes the JSON body
///
/// Only plain `http://` URLs are supported by the connector; a TLS
/// endpoint needs to sit behind a local proxy.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
    client: Client<HttpConnector>,
}

impl HttpSource {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            url,
            timeout,
            client: Client::new(),
        }
    }

    async fn get_body(&self) -> Result<Bytes, SourceError> {
        let uri: Uri = self.url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            SourceError::InvalidUrl {
                url: self.url.clone(),
                message: e.to_string(),
            }
        })?;

        let request = Request::get(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| SourceError::InvalidUrl {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let response = self.client.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        Ok(hyper::body::to_bytes(response.into_body()).await?)
    }
}

#[async_trait]
impl TransactionSource for HttpSource {
    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }

    async fn fetch(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        let body = tokio::time::timeout(self.timeout, self.get_body())
            .await
            .map_err(|_| SourceError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        let records = decode_records(&body)?;
        log::debug!("Fetched {} records from {}", records.len(), self.url);
        Ok(records)
    }
}
