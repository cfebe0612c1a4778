//! Hook handler trait.
//!
//! Defines the [`HookHandler`] trait that all hook implementations satisfy.
//! Handlers are registered with the [`HookRegistry`](crate::registry::HookRegistry)
//! and invoked by the [`HookEngine`](crate::engine::HookEngine).

use crate::errors::HookError;
use crate::types::{HookContext, HookKey};

/// A compilation hook handler.
///
/// Handlers run synchronously on the host's compilation thread and must not
/// block.
///
/// # Priority
///
/// Higher priority handlers run first. Default priority is 0.
///
/// # Filtering
///
/// Override [`should_handle`](HookHandler::should_handle) to skip the handler
/// for specific contexts.
pub trait HookHandler: Send + Sync {
    /// Name for this handler, unique per hook key.
    fn name(&self) -> &str;

    /// Which hook this handler subscribes to.
    fn hook_key(&self) -> HookKey;

    /// Execution priority. Higher runs first. Default: 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Optional human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Run the handler.
    ///
    /// Errors are logged by the engine and do not stop other handlers.
    fn handle(&self, context: &mut HookContext<'_>) -> Result<(), HookError>;

    /// Optional filter. Return `false` to skip this handler for the context.
    fn should_handle(&self, _context: &HookContext<'_>) -> bool {
        true
    }
}
