use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::metrics::REJECTIONS;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Every way a signed-URL request can end short of a URL.
///
/// Only the fixed client message reaches the response body; the provider
/// detail carried by [`ApiError::Provider`] goes to the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("storage provider is not configured")]
    Configuration,
    #[error("origin or referer not allowed")]
    Forbidden,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("invalid path parameter")]
    InvalidPath,
    #[error("storage provider failed: {0}")]
    Provider(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidPath => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            ApiError::Configuration => "Server configuration error — missing env vars",
            ApiError::Forbidden => "Forbidden",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::RateLimited => "Too many requests",
            ApiError::InvalidPath => "Invalid path parameter",
            ApiError::Provider(_) => "Failed to generate signed URL",
        }
    }

    // label for the rejections metric
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::Configuration => "configuration",
            ApiError::Forbidden => "forbidden",
            ApiError::MethodNotAllowed => "method",
            ApiError::RateLimited => "rate_limited",
            ApiError::InvalidPath => "invalid_path",
            ApiError::Provider(_) => "provider",
        }
    }

    /// Whether the same request may succeed later without changes.
    pub fn retryable(&self) -> bool {
        matches!(self, ApiError::RateLimited | ApiError::Provider(_))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        REJECTIONS.with_label_values(&[self.reason()]).inc();
        let body = ErrorBody {
            error: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
