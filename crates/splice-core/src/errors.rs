//! Core error types.

use thiserror::Error;

/// Errors raised while building core values from external input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A runtime global name did not match any known identifier.
    #[error("unknown runtime global: {0}")]
    UnknownRuntimeGlobal(String),

    /// A runtime module stage name did not match any known stage.
    #[error("unknown runtime module stage: {0}")]
    UnknownStage(String),

    /// A fragment format name did not match any known format.
    #[error("unknown fragment format: {0}")]
    UnknownFormat(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
