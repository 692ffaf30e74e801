//! Load state machine
//!
//! Both the login and the dashboard flow move through the same four states:
//!
//! ```text
//! Idle ──trigger──▶ Loading ──ok──▶ Loaded(T)
//!   ▲                │  ▲  └─err──▶ Failed(message)
//!   └────reset───────┘  └──re-trigger (from any state but Idle)
//! ```

use crate::error::TransitionError;
use serde::Serialize;

/// State of one asynchronous flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LoadState<T> {
    /// Nothing requested yet, or reset
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Latest request succeeded
    Loaded(T),
    /// Latest request failed; carries the user-facing message
    Failed(String),
}

impl<T> LoadState<T> {
    /// Data-free tag of this state
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Loading => Phase::Loading,
            Self::Loaded(_) => Phase::Loaded,
            Self::Failed(_) => Phase::Failed,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded data, if any
    #[inline]
    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Failure message, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Map the loaded data
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Idle => LoadState::Idle,
            Self::Loading => LoadState::Loading,
            Self::Loaded(data) => LoadState::Loaded(f(data)),
            Self::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T> From<Result<T, String>> for LoadState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Self::Loaded(data),
            Err(message) => Self::Failed(message),
        }
    }
}

/// Tag of a [`LoadState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Validates a state transition.
///
/// # Errors
/// `TransitionError` when `to` is not reachable from `from` in one step.
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: Phase) -> Vec<Phase> {
    use Phase::*;
    match from {
        Idle => vec![Loading, Idle],
        Loading => vec![Loading, Loaded, Failed, Idle],
        Loaded => vec![Loading, Idle],
        Failed => vec![Loading, Idle],
    }
}
