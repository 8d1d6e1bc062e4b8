//! Error types for myorm

use thiserror::Error;

/// Result type alias for myorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrmError {
    /// Fetch returned no rows where at least one was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// A named join that the model does not declare
    #[error("Unknown join: {0}")]
    UnknownJoin(String),

    /// A named filter that the model does not declare
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// A model token that is not registered
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Identifier the escaper refuses to quote
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Builder state that cannot be rendered
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error reported by the executor, passed through unmodified
    #[error("Execution error: {0}")]
    Execution(String),

    /// The executor answered with a result shape that does not match the fetch mode
    #[error("Unexpected executor output: expected {expected}, got {got}")]
    UnexpectedOutput {
        expected: &'static str,
        got: &'static str,
    },

    /// Row decode/mapping error
    #[error("Decode error: {0}")]
    Decode(String),
}

impl OrmError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error comes from a model descriptor lookup
    pub fn is_descriptor_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownJoin(_) | Self::UnknownFilter(_) | Self::UnknownModel(_)
        )
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
