//! Conference Central backend
//!
//! A small backend for a conference-management application: authenticated
//! users maintain a profile, create and query conferences, and register for
//! a conference seat. The registration path is the transactional core; the
//! rest is CRUD over a keyed entity store reached through the adapter in
//! [`store`].

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced to callers.
///
/// Business-rule outcomes (already registered, no seats, ...) are returned
/// as values from the transactional functions and converted into these
/// variants at the service/handler boundary. Store-level conflicts are
/// retried internally; [`Error::TxConflict`] only escapes when the retry
/// budget is exhausted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid principal (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (403). Reserved for future use.
    #[error("{0}")]
    Forbidden(String),

    /// Missing entity or undecodable key (404).
    #[error("{0}")]
    NotFound(String),

    /// Business-rule violation on a transactional step (409).
    #[error("{0}")]
    Conflict(String),

    /// Malformed form or disallowed query (400).
    #[error("{0}")]
    BadRequest(String),

    /// Retry budget exhausted on store contention (503).
    #[error("{0}")]
    Unavailable(String),

    /// A transaction commit lost an optimistic-concurrency race. Retryable.
    #[error("transaction commit conflict")]
    TxConflict,

    /// Invariant violation or store fault (500).
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) | Self::TxConflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Unavailable(_) | Self::TxConflict => "unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_expected_statuses() {
        assert_eq!(
            Error::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::TxConflict.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            Error::Unavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
