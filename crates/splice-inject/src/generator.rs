//! Runtime fragment generation.
//!
//! A generator turns a chunk's requirement set into the source of the
//! fragment that gets injected. Generators are pure: the same set of globals
//! always yields byte-identical output, whatever order the host inserted
//! them in.

use serde_json::Value;
use splice_core::{FragmentFormat, RuntimeFragment, RuntimeModuleStage, RuntimeRequirements};

/// Produces the runtime fragment for one chunk.
pub trait FragmentGenerator: Send + Sync {
    /// Generate a fragment for `requirements`.
    fn generate(&self, requirements: &RuntimeRequirements) -> RuntimeFragment;
}

/// Default generator: a fragment that logs the chunk's requirement list.
///
/// The list is rendered per [`FragmentFormat`] and sorted by rendered text,
/// e.g. `console.log(["ensureChunkHandlers","hmrDownloadUpdateHandlers"])`.
#[derive(Debug, Clone)]
pub struct RequirementLogGenerator {
    module_name: String,
    stage: RuntimeModuleStage,
    format: FragmentFormat,
}

impl RequirementLogGenerator {
    /// Module name used when none is configured.
    pub const DEFAULT_MODULE_NAME: &'static str = "chunk loading runtime";

    /// Create a generator emitting fragments named `module_name`.
    #[must_use]
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            stage: RuntimeModuleStage::Attach,
            format: FragmentFormat::Names,
        }
    }

    /// Set the stage of generated fragments.
    #[must_use]
    pub fn with_stage(mut self, stage: RuntimeModuleStage) -> Self {
        self.stage = stage;
        self
    }

    /// Set how requirements are rendered.
    #[must_use]
    pub fn with_format(mut self, format: FragmentFormat) -> Self {
        self.format = format;
        self
    }

    /// Requirements rendered and sorted; the canonical list embedded in the fragment.
    #[must_use]
    pub fn render_list(&self, requirements: &RuntimeRequirements) -> Vec<&'static str> {
        let mut rendered: Vec<&'static str> = requirements
            .iter()
            .map(|global| self.format.render(*global))
            .collect();
        rendered.sort_unstable();
        rendered
    }
}

impl Default for RequirementLogGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MODULE_NAME)
    }
}

impl FragmentGenerator for RequirementLogGenerator {
    fn generate(&self, requirements: &RuntimeRequirements) -> RuntimeFragment {
        let list = Value::from(self.render_list(requirements));
        RuntimeFragment::new(
            self.module_name.clone(),
            self.stage,
            format!("console.log({list})"),
        )
    }
}
