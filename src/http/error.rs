//! Mapping from store failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::CatalogError;

/// Error returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// A store operation failed
    Catalog(CatalogError),

    /// The `:id` path segment is not a number
    UnknownId(String),

    /// The blocking task running a store operation panicked or was cancelled
    Task(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::DuplicateCode(_) => StatusCode::CONFLICT,
                CatalogError::Io(_)
                | CatalogError::Parse(_)
                | CatalogError::Encode(_)
                | CatalogError::IdsExhausted
                | CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Task(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Catalog(err) => err.to_string(),
            ApiError::UnknownId(raw) => format!("Product {:?} not found", raw),
            ApiError::Task(reason) => format!("Request aborted: {}", reason),
        };

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }

        (status, message).into_response()
    }
}
