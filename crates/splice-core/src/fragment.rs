//! Runtime fragments and the host surface that accepts them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkUkey;
use crate::errors::CoreError;
use crate::runtime_globals::RuntimeGlobal;

/// Ordering slot of a runtime fragment within a chunk's runtime.
///
/// Lower stages are emitted first. Values mirror the bundler's runtime
/// module stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeModuleStage {
    /// Regular runtime code.
    Normal,
    /// Runtime code other modules build on.
    Basic,
    /// Code attaching to already-defined runtime functions.
    #[default]
    Attach,
    /// Code triggering runtime behavior, emitted last.
    Trigger,
}

impl RuntimeModuleStage {
    /// Numeric stage value.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Basic => 5,
            Self::Attach => 10,
            Self::Trigger => 20,
        }
    }
}

impl fmt::Display for RuntimeModuleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Basic => write!(f, "basic"),
            Self::Attach => write!(f, "attach"),
            Self::Trigger => write!(f, "trigger"),
        }
    }
}

impl FromStr for RuntimeModuleStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "basic" => Ok(Self::Basic),
            "attach" => Ok(Self::Attach),
            "trigger" => Ok(Self::Trigger),
            _ => Err(CoreError::UnknownStage(s.to_string())),
        }
    }
}

/// How requirement identifiers are rendered inside a generated fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentFormat {
    /// Camel-case names, e.g. `ensureChunkHandlers`.
    #[default]
    Names,
    /// Runtime expressions, e.g. `__webpack_require__.f`.
    Expressions,
}

impl FragmentFormat {
    /// Render one global in this format.
    #[must_use]
    pub fn render(self, global: RuntimeGlobal) -> &'static str {
        match self {
            Self::Names => global.name(),
            Self::Expressions => global.expression(),
        }
    }
}

impl FromStr for FragmentFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "names" => Ok(Self::Names),
            "expressions" => Ok(Self::Expressions),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}

/// A generated runtime code unit attached to one chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeFragment {
    /// Runtime module name shown in bundler diagnostics.
    pub name: String,
    /// Emission stage.
    pub stage: RuntimeModuleStage,
    /// Generated source text.
    pub source: String,
}

impl RuntimeFragment {
    /// Create a fragment.
    #[must_use]
    pub fn new(name: impl Into<String>, stage: RuntimeModuleStage, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage,
            source: source.into(),
        }
    }
}

/// Host API for embedding a fragment in a chunk's output.
pub trait FragmentSink {
    /// Attach `fragment` to the chunk identified by `chunk`.
    fn attach_runtime_fragment(&mut self, chunk: ChunkUkey, fragment: RuntimeFragment);
}

impl FragmentSink for Vec<(ChunkUkey, RuntimeFragment)> {
    fn attach_runtime_fragment(&mut self, chunk: ChunkUkey, fragment: RuntimeFragment) {
        self.push((chunk, fragment));
    }
}
