//! # splice-inject
//!
//! Injects a runtime fragment into every chunk that needs one of a set of
//! runtime capabilities, exactly once per chunk per compilation.
//!
//! - [`generator`]: turns a requirement set into fragment source.
//! - [`coordinator`]: the once-per-chunk bookkeeping.
//! - [`plugin`]: registers the coordinator on a host's hooks.
//!
//! ```rust
//! use splice_hooks::HookEngine;
//! use splice_inject::RuntimeInjectionPlugin;
//!
//! let mut engine = HookEngine::default();
//! let plugin = RuntimeInjectionPlugin::default();
//! plugin.apply(engine.registry_mut()).unwrap();
//! assert_eq!(engine.registry().count(), 3);
//! ```

#![deny(unsafe_code)]

pub mod coordinator;
pub mod generator;
pub mod plugin;

pub use coordinator::InjectionCoordinator;
pub use generator::{FragmentGenerator, RequirementLogGenerator};
pub use plugin::RuntimeInjectionPlugin;
