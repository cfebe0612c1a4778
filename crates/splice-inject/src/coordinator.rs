//! Once-per-chunk injection coordinator.
//!
//! The coordinator is driven by two plain callbacks and knows nothing about
//! the hook framework:
//!
//! - [`on_compilation_start`](InjectionCoordinator::on_compilation_start)
//!   forgets every chunk seen so far.
//! - [`on_requirement_observed`](InjectionCoordinator::on_requirement_observed)
//!   injects a fragment the first time a chunk is reported and ignores every
//!   later report for the same chunk, whatever the capability.
//!
//! Chunks are tracked by [`ChunkUkey`], never by name.

use std::collections::HashSet;
use std::sync::Arc;

use splice_core::{Chunk, ChunkUkey, FragmentSink, RuntimeGlobal, RuntimeRequirements};
use tracing::debug;

use crate::generator::{FragmentGenerator, RequirementLogGenerator};

/// Tracks which chunks received a fragment in the current compilation.
pub struct InjectionCoordinator {
    generator: Arc<dyn FragmentGenerator>,
    seen: HashSet<ChunkUkey>,
    generation: u64,
}

impl InjectionCoordinator {
    /// Create a coordinator that injects what `generator` produces.
    #[must_use]
    pub fn new(generator: Arc<dyn FragmentGenerator>) -> Self {
        Self {
            generator,
            seen: HashSet::new(),
            generation: 0,
        }
    }

    /// Start tracking a new compilation. Every chunk becomes unseen again.
    pub fn on_compilation_start(&mut self) {
        self.seen.clear();
        self.generation += 1;
        debug!(generation = self.generation, "compilation started, seen chunks reset");
    }

    /// Handle one (capability, chunk) notification.
    ///
    /// Returns `true` if a fragment was delivered to `sink`. At most one
    /// delivery happens per chunk between two
    /// [`on_compilation_start`](Self::on_compilation_start) calls.
    pub fn on_requirement_observed(
        &mut self,
        capability: RuntimeGlobal,
        chunk: &Chunk,
        requirements: &RuntimeRequirements,
        sink: &mut dyn FragmentSink,
    ) -> bool {
        if !self.seen.insert(chunk.ukey()) {
            debug!(%capability, chunk = %chunk.display_name(), "already added");
            return false;
        }

        debug!(
            %capability,
            chunk = %chunk.display_name(),
            requirements = ?requirements.sorted(),
            "adding"
        );
        let fragment = self.generator.generate(requirements);
        sink.attach_runtime_fragment(chunk.ukey(), fragment);
        true
    }

    /// Whether `chunk` already received a fragment in this compilation.
    #[must_use]
    pub fn is_seen(&self, chunk: ChunkUkey) -> bool {
        self.seen.contains(&chunk)
    }

    /// Number of chunks injected in this compilation.
    #[must_use]
    pub fn injected_count(&self) -> usize {
        self.seen.len()
    }

    /// How many compilations this coordinator has started.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for InjectionCoordinator {
    fn default() -> Self {
        Self::new(Arc::new(RequirementLogGenerator::default()))
    }
}

impl std::fmt::Debug for InjectionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionCoordinator")
            .field("generation", &self.generation)
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}
