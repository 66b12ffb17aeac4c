//! Dispatch error taxonomy.

use rag_manager::RagManagerError;
use thiserror::Error;

/// Failures surfaced by [`crate::FunctionExecutor::execute`].
///
/// The first three are caller errors with a user-facing message; `Provider`
/// wraps whatever the embedding provider or vector store reported.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required parameter missing, empty, or of the wrong type.
    #[error("{0}")]
    Parameter(String),

    /// Collection exists when it must not, or the other way round.
    #[error("{0}")]
    CollectionState(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error(transparent)]
    Provider(#[from] RagManagerError),
}

impl DispatchError {
    pub(crate) fn required(field: &str) -> Self {
        Self::Parameter(format!("Parameter '{field}' is required"))
    }

    pub(crate) fn invalid(field: &str, expected: &str) -> Self {
        Self::Parameter(format!("Parameter '{field}' must be {expected}"))
    }

    pub(crate) fn missing_collection(name: &str) -> Self {
        Self::CollectionState(format!("Collection '{name}' doesn't exist"))
    }

    pub(crate) fn existing_collection(name: &str) -> Self {
        Self::CollectionState(format!("Collection '{name}' already exists"))
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "PARAMETER_ERROR",
            Self::CollectionState(_) => "COLLECTION_STATE_ERROR",
            Self::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            Self::Provider(_) => "PROVIDER_ERROR",
        }
    }

    /// `true` when the caller can fix the request and retry.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Provider(_))
    }
}
