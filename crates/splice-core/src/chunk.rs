//! Chunk handles and their identity keys.
//!
//! A chunk is owned by the host compilation. Everything downstream refers to
//! it through its [`ChunkUkey`], a process-unique key allocated when the chunk
//! is created. Two chunks that happen to share a name are still distinct
//! chunks; equality and hashing on [`Chunk`] go through the key only.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_UKEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkUkey(u64);

impl ChunkUkey {
    /// Allocate a fresh key. Never returns a key handed out before.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_UKEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChunkUkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk#{}", self.0)
    }
}

/// A unit of bundled output.
///
/// Cloning a `Chunk` clones the handle, not the identity: the clone compares
/// equal to the original and carries the same [`ChunkUkey`].
#[derive(Clone, Debug, Serialize)]
pub struct Chunk {
    ukey: ChunkUkey,
    name: Option<String>,
}

impl Chunk {
    /// Create a named chunk with a fresh identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ukey: ChunkUkey::next(),
            name: Some(name.into()),
        }
    }

    /// Create an anonymous chunk with a fresh identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            ukey: ChunkUkey::next(),
            name: None,
        }
    }

    /// Identity key of this chunk.
    #[must_use]
    pub fn ukey(&self) -> ChunkUkey {
        self.ukey
    }

    /// Human-readable name, if the host assigned one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for logs and reports; falls back to the identity key.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.ukey.to_string())
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.ukey == other.ukey
    }
}

impl Eq for Chunk {}

impl Hash for Chunk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ukey.hash(state);
    }
}
