//! Error types for record construction

/// Failure to build a [`DynamicRecord`](crate::DynamicRecord)
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Top-level JSON value is not an object
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Input is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
