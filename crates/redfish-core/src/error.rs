//! Error types for Redfish operations.
//!
//! This module provides the error type shared by every Redfish and Swordfish
//! operation, the mapping from HTTP status codes (and Redfish error documents)
//! to that type, and the per-link [`CollectionError`] returned when members of
//! a collection fail to resolve.

use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Main error type for Redfish operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The service could not be reached or is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to decode a response body or a stored snapshot
    #[error("Failed to decode resource: {0}")]
    DecodeError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The service rejected the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The resource changed underneath the request (409 / 412)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid endpoint or resource URI
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// An update was requested on a resource that was never decoded from the service
    #[error("No snapshot captured for {0}; fetch the resource before updating it")]
    MissingSnapshot(String),

    /// The resource has no bound client to talk to
    #[error("Resource {0} is not bound to a client")]
    Unbound(String),

    /// One or more members of a collection failed to resolve
    #[error("{0}")]
    Collection(CollectionError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for Redfish operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::MissingSnapshot(_) => "MISSING_SNAPSHOT",
            Self::Unbound(_) => "UNBOUND",
            Self::Collection(_) => "COLLECTION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::MissingSnapshot(_)
        )
    }

    /// Returns the collection failures if this is a collection error.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&CollectionError> {
        match self {
            Self::Collection(err) => Some(err),
            _ => None,
        }
    }

    /// Map a non-success HTTP status and its body to an error.
    ///
    /// When the body is a Redfish error document the most specific message it
    /// carries is used instead of the raw body.
    #[must_use]
    pub fn from_status(status: StatusCode, uri: &str, body: &str) -> Self {
        let text = format!("{uri}: {}", error_message(body));
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(text),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(text),
            StatusCode::BAD_REQUEST => Self::InvalidRequest(text),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Self::Conflict(text),
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                Self::ServiceUnavailable(format!("temporarily unavailable: {text}"))
            }
            status if status.is_server_error() => {
                Self::ServiceUnavailable(format!("server error {status}: {text}"))
            }
            _ => Self::HttpError(format!("status {status}: {text}")),
        }
    }
}

#[derive(Deserialize)]
struct RedfishErrorDocument {
    error: RedfishErrorBody,
}

#[derive(Deserialize)]
struct RedfishErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(rename = "@Message.ExtendedInfo", default)]
    extended_info: Vec<ExtendedInfo>,
}

#[derive(Deserialize)]
struct ExtendedInfo {
    #[serde(rename = "Message", default)]
    message: String,
}

fn error_message(body: &str) -> String {
    let Ok(document) = serde_json::from_str::<RedfishErrorDocument>(body) else {
        return body.trim().to_string();
    };
    let error = document.error;

    let extended: Vec<&str> = error
        .extended_info
        .iter()
        .map(|info| info.message.as_str())
        .filter(|message| !message.is_empty())
        .collect();

    if !extended.is_empty() {
        extended.join("; ")
    } else if !error.message.is_empty() {
        error.message
    } else {
        error.code
    }
}

/// Per-link failures collected while resolving a collection.
///
/// An empty error means every member resolved. Failures are kept in link order
/// so that formatting and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionError {
    failures: BTreeMap<String, Error>,
}

impl CollectionError {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure for a link. A later failure for the same link replaces the earlier one.
    pub fn record(&mut self, link: impl Into<String>, error: Error) {
        self.failures.insert(link.into(), error);
    }

    /// Returns true if no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failing links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// The error recorded for a link, if any.
    #[must_use]
    pub fn get(&self, link: &str) -> Option<&Error> {
        self.failures.get(link)
    }

    /// Iterate over failing links and their errors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.failures.iter().map(|(link, err)| (link.as_str(), err))
    }

    /// Consume the aggregate, returning the underlying map.
    #[must_use]
    pub fn into_failures(self) -> BTreeMap<String, Error> {
        self.failures
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to retrieve {} collection member(s)",
            self.failures.len()
        )?;
        for (link, err) in &self.failures {
            write!(f, "\n  {link}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectionError {}

impl From<CollectionError> for Error {
    fn from(err: CollectionError) -> Self {
        Self::Collection(err)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::DecodeError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
