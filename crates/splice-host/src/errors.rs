//! Host error types.

use splice_hooks::HookError;
use splice_settings::SettingsError;
use thiserror::Error;

/// Errors raised while loading a build plan or setting up a compiler.
#[derive(Debug, Error)]
pub enum HostError {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a manifest, or a report that failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A manifest that parsed but describes an invalid plan.
    #[error("invalid manifest: {0}")]
    Manifest(String),
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A plugin failed to register its hooks.
    #[error("plugin '{name}' failed to apply: {source}")]
    Plugin {
        /// Plugin name.
        name: String,
        /// Registration failure.
        source: HookError,
    },
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;
