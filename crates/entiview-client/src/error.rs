//! Error types for the API clients
//!
//! Every call reports exactly one outcome. The classification shared by
//! both clients is exposed through [`ErrorKind`]:
//! - Local validation (nothing was sent)
//! - Server rejection (non-success status)
//! - Empty response (success status, unusable body)
//! - Network failure (transport level)

use std::fmt::{self, Display, Formatter};

/// Classification shared by [`AuthError`] and [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally before any request
    LocalValidation,
    /// Server answered with a non-success status
    ServerRejection,
    /// Success status without a usable payload
    EmptyResponse,
    /// Transport failed
    NetworkFailure,
}

/// Non-success answer from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// HTTP status code
    pub status: u16,
    /// Server-supplied message, or the reason phrase when there is none
    pub message: String,
}

impl Rejection {
    /// Create a rejection
    #[inline]
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

/// Credential exchange errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Username or password is blank
    #[error("username and password cannot be empty")]
    EmptyCredentials,

    /// Server rejected the credentials
    #[error("rejected by server ({0})")]
    Rejected(Rejection),

    /// Success status but no token in the body
    #[error("login response is empty")]
    EmptyResponse,

    /// Transport failed
    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl AuthError {
    /// Classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCredentials => ErrorKind::LocalValidation,
            Self::Rejected(_) => ErrorKind::ServerRejection,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
        }
    }

    /// Check if a user-initiated retry can succeed without new input
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::EmptyCredentials)
    }

    /// Message shown to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCredentials => "Username and password cannot be empty".to_string(),
            Self::Rejected(rejection) => format!("Login failed: {}", rejection.message),
            Self::EmptyResponse => "Login response is empty".to_string(),
            Self::NetworkFailure(detail) => format!("Network error: {detail}"),
        }
    }
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

/// Dashboard fetch errors
///
/// An expired or unknown keypass has no dedicated variant; it arrives as
/// [`FetchError::Rejected`] with whatever the server said.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Server rejected the request
    #[error("rejected by server ({0})")]
    Rejected(Rejection),

    /// Success status but the body is not a dashboard
    #[error("dashboard response is empty")]
    EmptyResponse,

    /// Transport failed
    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl FetchError {
    /// Classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(_) => ErrorKind::ServerRejection,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
        }
    }

    /// Every fetch failure may be retried with the same keypass
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// Message shown to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(rejection) => format!("Failed to load dashboard: {}", rejection.message),
            Self::EmptyResponse => "Dashboard response is empty".to_string(),
            Self::NetworkFailure(detail) => format!("Network error: {detail}"),
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

/// Transport-level failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connect, read or total timeout elapsed
    #[error("timed out: {0}")]
    Timeout(String),

    /// DNS, connection reset, TLS and similar
    #[error("{0}")]
    Network(String),

    /// Request URL could not be built from the base URL
    #[error("invalid request target: {0}")]
    InvalidTarget(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config text does not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Base URL does not parse
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Base URL is not http or https
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    /// A timeout is zero
    #[error("{0} timeout must be non-zero")]
    ZeroTimeout(&'static str),

    /// HTTP client could not be built
    #[error("cannot build http client: {0}")]
    Client(String),
}
