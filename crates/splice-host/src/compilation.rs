//! One compilation run and the report built from it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splice_core::{Chunk, ChunkUkey, FragmentSink, RuntimeFragment, RuntimeGlobal, RuntimeRequirements};
use splice_hooks::CompilationId;
use splice_settings::BundlerFlavor;
use tracing::{debug, warn};

use crate::errors::Result;

/// File name used by [`InjectionReport::write_to`].
pub const REPORT_FILE: &str = "injections.json";

#[derive(Debug)]
struct CompiledChunk {
    chunk: Chunk,
    filename: String,
    requirements: RuntimeRequirements,
}

/// Result of one [`Compiler::compile`](crate::Compiler::compile) call.
///
/// Collects the fragments plugins attach, per chunk.
#[derive(Debug)]
pub struct Compilation {
    id: CompilationId,
    bundler: BundlerFlavor,
    chunks: Vec<CompiledChunk>,
    fragments: HashMap<ChunkUkey, Vec<RuntimeFragment>>,
}

impl Compilation {
    pub(crate) fn new(id: CompilationId, bundler: BundlerFlavor) -> Self {
        Self {
            id,
            bundler,
            chunks: Vec::new(),
            fragments: HashMap::new(),
        }
    }

    pub(crate) fn add_chunk(&mut self, chunk: Chunk, filename: String, requirements: RuntimeRequirements) {
        self.chunks.push(CompiledChunk {
            chunk,
            filename,
            requirements,
        });
    }

    /// Compilation id.
    #[must_use]
    pub fn id(&self) -> CompilationId {
        self.id
    }

    /// Bundler flavor the compilation ran as.
    #[must_use]
    pub fn bundler(&self) -> BundlerFlavor {
        self.bundler
    }

    /// Chunks in compilation order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().map(|compiled| &compiled.chunk)
    }

    /// Requirements a chunk ended up with after host wiring.
    #[must_use]
    pub fn requirements_for(&self, ukey: ChunkUkey) -> Option<&RuntimeRequirements> {
        self.chunks
            .iter()
            .find(|compiled| compiled.chunk.ukey() == ukey)
            .map(|compiled| &compiled.requirements)
    }

    /// Fragments attached to a chunk, in attach order.
    #[must_use]
    pub fn fragments_for(&self, ukey: ChunkUkey) -> &[RuntimeFragment] {
        self.fragments.get(&ukey).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of attached fragments.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.values().map(Vec::len).sum()
    }

    /// Build a serializable report.
    #[must_use]
    pub fn report(&self) -> InjectionReport {
        InjectionReport {
            compilation: self.id,
            bundler: self.bundler,
            chunks: self
                .chunks
                .iter()
                .map(|compiled| ChunkReport {
                    name: compiled.chunk.display_name(),
                    filename: compiled.filename.clone(),
                    requirements: compiled.requirements.sorted(),
                    fragments: self.fragments_for(compiled.chunk.ukey()).to_vec(),
                })
                .collect(),
        }
    }
}

impl FragmentSink for Compilation {
    fn attach_runtime_fragment(&mut self, chunk: ChunkUkey, fragment: RuntimeFragment) {
        if !self.chunks.iter().any(|compiled| compiled.chunk.ukey() == chunk) {
            warn!(compilation = %self.id, %chunk, "fragment attached to a chunk outside this compilation");
        }
        debug!(compilation = %self.id, %chunk, name = %fragment.name, "runtime fragment attached");
        self.fragments.entry(chunk).or_default().push(fragment);
    }
}

/// Serializable summary of a compilation's injections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionReport {
    /// Compilation the report describes.
    pub compilation: CompilationId,
    /// Bundler flavor.
    pub bundler: BundlerFlavor,
    /// One entry per chunk, in compilation order.
    pub chunks: Vec<ChunkReport>,
}

/// Injections for one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkReport {
    /// Chunk name, or its key for unnamed chunks.
    pub name: String,
    /// Output filename rendered from the filename template.
    pub filename: String,
    /// Final requirement set, sorted by name.
    pub requirements: Vec<RuntimeGlobal>,
    /// Fragments attached to the chunk.
    pub fragments: Vec<RuntimeFragment>,
}

impl InjectionReport {
    /// Number of chunks that received at least one fragment.
    #[must_use]
    pub fn injected_chunks(&self) -> usize {
        self.chunks.iter().filter(|chunk| !chunk.fragments.is_empty()).count()
    }

    /// Write the report as pretty JSON to `dir/injections.json`, creating `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        debug!(?path, "injection report written");
        Ok(path)
    }
}

impl fmt::Display for InjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}): {}/{} chunks injected",
            self.compilation,
            self.bundler,
            self.injected_chunks(),
            self.chunks.len()
        )?;
        for chunk in &self.chunks {
            writeln!(f, "  {} -> {}", chunk.name, chunk.filename)?;
            for fragment in &chunk.fragments {
                writeln!(f, "    [{}@{}] {}", fragment.name, fragment.stage, fragment.source)?;
            }
        }
        Ok(())
    }
}
