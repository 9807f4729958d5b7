//! Error taxonomy for calls against the report service

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Only a rejected or missing credential aborts a run on its own.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Auth(_))
    }

    pub fn from_status(status: StatusCode, context: &str) -> Self {
        let message = format!("{context} returned {status}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth(message),
            StatusCode::NOT_FOUND => FetchError::NotFound(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => FetchError::Transient(message),
            status if status.is_server_error() => FetchError::Transient(message),
            _ => FetchError::MalformedResponse(message),
        }
    }

    /// Classifies a GraphQL `errors[].message` entry.
    pub fn from_graphql_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();

        if lower.contains("permission") || lower.contains("unauthorized") || lower.contains("unauthenticated") {
            return FetchError::Auth(message.to_string());
        }

        if lower.contains("does not exist") || lower.contains("not found") || lower.contains("no report") {
            return FetchError::NotFound(message.to_string());
        }

        FetchError::MalformedResponse(message.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::from_status(status, "request");
        }

        if err.is_timeout() || err.is_connect() || err.is_request() {
            return FetchError::Transient(err.to_string());
        }

        if err.is_decode() || err.is_body() {
            return FetchError::MalformedResponse(err.to_string());
        }

        FetchError::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}
