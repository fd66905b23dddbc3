//! Error types for timepipe-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use timepipe_core::CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The data source could not be reached or returned garbage
    #[error(transparent)]
    Upstream(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Upstream(e) => serde_json::json!({
                "success": false,
                "error": e.to_details(),
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_is_bad_gateway() {
        let upstream = ApiError::from(CoreError::FetchFailure {
            source_name: "http://localhost:5000".to_string(),
            message: "connection refused".to_string(),
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert!(upstream.to_string().contains("connection refused"));
    }
}
