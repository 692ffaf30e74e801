//! Error types for Entiview core

use crate::load_state::Phase;

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for session orchestration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Operation needs a keypass and there is none
    #[error("not logged in")]
    NotLoggedIn,

    /// Login flow ended in `Failed`
    #[error("{0}")]
    Login(String),

    /// Dashboard flow ended in `Failed`
    #[error("{0}")]
    Dashboard(String),

    /// A newer trigger or a reset replaced this attempt before it committed
    #[error("superseded by a newer request")]
    Superseded,

    /// Background task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),

    /// Record list error
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl CoreError {
    /// Check if error is retryable by the user without changing input
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Dashboard(_) | Self::Superseded | Self::Task(_))
    }
}

/// Record list errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// Selected position is outside the list
    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Illegal load-state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal load state transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: Phase,
    pub to: Phase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(CoreError::Dashboard("Network error: reset".into()).is_retryable());
        assert!(CoreError::Superseded.is_retryable());
        assert!(!CoreError::NotLoggedIn.is_retryable());
        assert!(!CoreError::Login("Login failed: nope".into()).is_retryable());
    }

    #[test]
    fn flow_errors_display_the_user_message() {
        let err = CoreError::Login("Username and password cannot be empty".into());
        assert_eq!(err.to_string(), "Username and password cannot be empty");

        let err = CoreError::from(ControllerError::IndexOutOfRange { index: 3, len: 2 });
        assert_eq!(err.to_string(), "index 3 out of range for 2 records");
    }
}
