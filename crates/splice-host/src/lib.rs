//! # splice-host
//!
//! A small in-memory compilation host. It has no module graph: a
//! [`BuildPlan`] lists the chunks and the runtime globals each one needs,
//! and the [`Compiler`] replays the lifecycle and requirement hooks a
//! bundler fires for them.
//!
//! ```rust
//! use splice_core::RuntimeGlobal;
//! use splice_host::{BuildPlan, Compiler};
//! use splice_inject::RuntimeInjectionPlugin;
//! use splice_settings::BundlerFlavor;
//!
//! let mut plan = BuildPlan::new();
//! let main = plan.add_chunk("main", true, [RuntimeGlobal::EnsureChunk]);
//!
//! let mut compiler = Compiler::new(BundlerFlavor::Rspack);
//! compiler.apply(&RuntimeInjectionPlugin::default()).unwrap();
//!
//! let compilation = compiler.compile(&plan);
//! assert_eq!(compilation.fragments_for(main).len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod compilation;
pub mod compiler;
pub mod errors;
pub mod hot;
pub mod plan;

pub use compilation::{ChunkReport, Compilation, InjectionReport, REPORT_FILE};
pub use compiler::{Compiler, Plugin};
pub use errors::{HostError, Result};
pub use plan::{BuildPlan, PlannedChunk};
