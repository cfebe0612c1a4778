//! Build plans: the chunks a compilation produces and what each one needs.
//!
//! A plan stands in for the bundler's graph and chunk-splitting phases. It
//! owns its [`Chunk`]s, so compiling the same plan twice reuses the same
//! chunk identities the way a watch-mode rebuild does.
//!
//! Plans are built in code or read from a JSON manifest:
//!
//! ```json
//! {
//!   "chunks": [
//!     { "name": "main", "entry": true, "requirements": ["ensureChunk"] },
//!     { "name": "lazy", "requirements": ["ensureChunkHandlers", "loadScript"] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use splice_core::{Chunk, ChunkUkey, RuntimeGlobal, RuntimeRequirements};
use tracing::debug;

use crate::errors::{HostError, Result};

/// One chunk of a [`BuildPlan`].
#[derive(Debug, Clone)]
pub struct PlannedChunk {
    chunk: Chunk,
    entry: bool,
    requirements: RuntimeRequirements,
}

impl PlannedChunk {
    /// The chunk itself.
    #[must_use]
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Whether the chunk is an entry point.
    #[must_use]
    pub fn is_entry(&self) -> bool {
        self.entry
    }

    /// Requirements declared for the chunk, before host wiring.
    #[must_use]
    pub fn requirements(&self) -> &RuntimeRequirements {
        &self.requirements
    }
}

/// Ordered list of chunks to compile.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    chunks: Vec<PlannedChunk>,
}

impl BuildPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named chunk and return its key.
    pub fn add_chunk(
        &mut self,
        name: impl Into<String>,
        entry: bool,
        requirements: impl IntoIterator<Item = RuntimeGlobal>,
    ) -> ChunkUkey {
        self.push(Chunk::new(name), entry, requirements.into_iter().collect())
    }

    /// Append an unnamed chunk and return its key.
    pub fn add_anonymous_chunk(
        &mut self,
        requirements: impl IntoIterator<Item = RuntimeGlobal>,
    ) -> ChunkUkey {
        self.push(Chunk::anonymous(), false, requirements.into_iter().collect())
    }

    fn push(&mut self, chunk: Chunk, entry: bool, requirements: RuntimeRequirements) -> ChunkUkey {
        let ukey = chunk.ukey();
        self.chunks.push(PlannedChunk {
            chunk,
            entry,
            requirements,
        });
        ukey
    }

    /// Chunks in plan order.
    #[must_use]
    pub fn chunks(&self) -> &[PlannedChunk] {
        &self.chunks
    }

    /// Look up a chunk by key.
    #[must_use]
    pub fn get(&self, ukey: ChunkUkey) -> Option<&PlannedChunk> {
        self.chunks.iter().find(|planned| planned.chunk.ukey() == ukey)
    }

    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the plan has no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Parse a JSON manifest.
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        let mut plan = Self::new();

        for (index, entry) in manifest.chunks.into_iter().enumerate() {
            let label = entry
                .name
                .clone()
                .unwrap_or_else(|| format!("#{index}"));
            let mut requirements = RuntimeRequirements::new();
            for raw in &entry.requirements {
                let global: RuntimeGlobal = raw
                    .parse()
                    .map_err(|err| HostError::Manifest(format!("chunk '{label}': {err}")))?;
                let _ = requirements.insert(global);
            }

            let chunk = match entry.name {
                Some(name) if name.trim().is_empty() => {
                    return Err(HostError::Manifest(format!(
                        "chunk #{index}: name must not be blank"
                    )));
                }
                Some(name) => Chunk::new(name),
                None => Chunk::anonymous(),
            };
            let _ = plan.push(chunk, entry.entry, requirements);
        }

        debug!(chunks = plan.len(), "build plan parsed");
        Ok(plan)
    }

    /// Read and parse a JSON manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(?path, "loading build plan");
        let content = std::fs::read_to_string(path)?;
        Self::from_manifest_str(&content)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    chunks: Vec<ManifestChunk>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestChunk {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    entry: bool,
    #[serde(default)]
    requirements: Vec<String>,
}
