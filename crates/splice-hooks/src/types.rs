//! Core types for the hook system.
//!
//! Defines the hook keys a host exposes, the per-call context handed to
//! handlers, and handler metadata for listings.

use std::fmt;

use serde::{Deserialize, Serialize};
use splice_core::{Chunk, FragmentSink, RuntimeGlobal, RuntimeRequirements};

/// Identity of one compilation run. A rebuild gets a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilationId(u64);

impl CompilationId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CompilationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation#{}", self.0)
    }
}

/// Hook a handler subscribes to.
///
/// Requirement hooks are keyed per runtime global: there is no "any
/// requirement" hook, so a handler interested in several globals is
/// registered once per global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "hook", content = "global", rename_all = "camelCase")]
pub enum HookKey {
    /// A new compilation started.
    ThisCompilation,
    /// A runtime global was found in a chunk's requirement tree.
    RuntimeRequirementInTree(RuntimeGlobal),
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThisCompilation => write!(f, "thisCompilation"),
            Self::RuntimeRequirementInTree(global) => {
                write!(f, "runtimeRequirementInTree({global})")
            }
        }
    }
}

/// Hook context, one variant per [`HookKey`] kind.
pub enum HookContext<'a> {
    /// Context for [`HookKey::ThisCompilation`].
    ThisCompilation {
        /// The compilation that just started.
        compilation: CompilationId,
    },
    /// Context for [`HookKey::RuntimeRequirementInTree`].
    RuntimeRequirementInTree {
        /// The global that was encountered.
        capability: RuntimeGlobal,
        /// Chunk whose requirement tree contains it.
        chunk: &'a Chunk,
        /// Everything the host accumulated for the chunk so far. Read-only.
        requirements: &'a RuntimeRequirements,
        /// Where injected runtime fragments go.
        sink: &'a mut dyn FragmentSink,
    },
}

impl HookContext<'_> {
    /// The hook this context belongs to.
    #[must_use]
    pub fn hook_key(&self) -> HookKey {
        match self {
            Self::ThisCompilation { .. } => HookKey::ThisCompilation,
            Self::RuntimeRequirementInTree { capability, .. } => {
                HookKey::RuntimeRequirementInTree(*capability)
            }
        }
    }
}

impl fmt::Debug for HookContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThisCompilation { compilation } => f
                .debug_struct("ThisCompilation")
                .field("compilation", compilation)
                .finish(),
            Self::RuntimeRequirementInTree {
                capability,
                chunk,
                requirements,
                ..
            } => f
                .debug_struct("RuntimeRequirementInTree")
                .field("capability", capability)
                .field("chunk", &chunk.display_name())
                .field("requirements", &requirements.sorted())
                .finish_non_exhaustive(),
        }
    }
}

/// Summary of a registered handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    /// Handler name.
    pub name: String,
    /// Hook it is registered on.
    pub hook_key: HookKey,
    /// Execution priority.
    pub priority: i32,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Counters returned by one hook call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookOutcome {
    /// Handlers that ran to completion.
    pub invoked: usize,
    /// Handlers skipped by their filter.
    pub skipped: usize,
    /// Handlers that returned an error.
    pub failed: usize,
}
