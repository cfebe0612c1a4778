//! # splice-core
//!
//! Shared vocabulary for the splice crates:
//!
//! - **Chunks**: [`Chunk`] and its identity key [`ChunkUkey`]
//! - **Runtime globals**: [`RuntimeGlobal`], the capability tokens a chunk's code may need
//! - **Requirement sets**: [`RuntimeRequirements`], the unordered set the host accumulates per chunk
//! - **Fragments**: [`RuntimeFragment`] and the [`FragmentSink`] the host exposes for attaching them
//! - **Errors**: [`CoreError`] via `thiserror`

#![deny(unsafe_code)]

pub mod chunk;
pub mod errors;
pub mod fragment;
pub mod requirements;
pub mod runtime_globals;

pub use chunk::{Chunk, ChunkUkey};
pub use errors::{CoreError, Result};
pub use fragment::{FragmentFormat, FragmentSink, RuntimeFragment, RuntimeModuleStage};
pub use requirements::RuntimeRequirements;
pub use runtime_globals::RuntimeGlobal;
