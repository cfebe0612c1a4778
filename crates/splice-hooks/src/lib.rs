//! # splice-hooks
//!
//! Compilation hook surface shared by hosts and plugins.
//!
//! A host exposes two kinds of hooks:
//! [`ThisCompilation`](types::HookKey::ThisCompilation), fired once per
//! compilation, and
//! [`RuntimeRequirementInTree`](types::HookKey::RuntimeRequirementInTree),
//! fired per (chunk, runtime global) while the host resolves each chunk's
//! runtime requirements. Requirement hooks are keyed per global; a plugin
//! registers once for each global it cares about.
//!
//! ## Fail-Open
//!
//! Handler errors never abort a compilation. The engine logs them and keeps
//! going.
//!
//! ## Example
//!
//! ```rust
//! use splice_hooks::engine::HookEngine;
//! use splice_hooks::registry::HookRegistry;
//!
//! let registry = HookRegistry::new();
//! let engine = HookEngine::new(registry);
//! // Register handlers, then call engine.call() at lifecycle points.
//! # let _ = engine;
//! ```

#![deny(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod handler;
pub mod registry;
pub mod types;

pub use engine::HookEngine;
pub use errors::HookError;
pub use handler::HookHandler;
pub use registry::HookRegistry;
pub use types::{CompilationId, HookContext, HookInfo, HookKey, HookOutcome};
