//! Hook error types.

use thiserror::Error;

/// Errors that can occur while registering or running hook handlers.
#[derive(Debug, Error)]
pub enum HookError {
    /// Hook handler returned an error.
    #[error("Hook handler error in '{name}': {message}")]
    HandlerError {
        /// Handler name.
        name: String,
        /// Error message from handler.
        message: String,
    },

    /// Hook registration error (e.g., duplicate name).
    #[error("Registration error: {0}")]
    Registration(String),

    /// A handler received a context for a hook it was not registered for.
    #[error("Handler '{name}' received unexpected context for {hook}")]
    UnexpectedContext {
        /// Handler name.
        name: String,
        /// Hook the context belongs to.
        hook: String,
    },
}
