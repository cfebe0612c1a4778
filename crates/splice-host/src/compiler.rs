//! The compiler: owns the hook engine and runs compilations over a plan.
//!
//! Each [`Compiler::compile`] call is one compilation instance:
//!
//! 1. allocate a [`CompilationId`] and fire `thisCompilation`
//! 2. for every planned chunk, wire implied requirements (see [`crate::hot`])
//! 3. fire `runtimeRequirementInTree` once per global in the chunk's set,
//!    each time passing the full set
//!
//! Fragments attached by handlers land in the returned [`Compilation`].

use splice_hooks::{CompilationId, HookContext, HookEngine, HookError, HookRegistry};
use splice_inject::RuntimeInjectionPlugin;
use splice_settings::{BundlerFlavor, OutputSettings, SpliceSettings};
use tracing::{debug, info, info_span};

use crate::compilation::Compilation;
use crate::errors::{HostError, Result};
use crate::hot::wire_requirements;
use crate::plan::BuildPlan;

/// Something that taps compiler hooks.
pub trait Plugin {
    /// Plugin name, used in errors and logs.
    fn name(&self) -> &str;

    /// Register hook handlers.
    fn apply(&self, registry: &mut HookRegistry) -> std::result::Result<(), HookError>;
}

impl Plugin for RuntimeInjectionPlugin {
    fn name(&self) -> &str {
        RuntimeInjectionPlugin::name(self)
    }

    fn apply(&self, registry: &mut HookRegistry) -> std::result::Result<(), HookError> {
        RuntimeInjectionPlugin::apply(self, registry)
    }
}

/// Runs compilations and dispatches their hooks.
#[derive(Debug)]
pub struct Compiler {
    engine: HookEngine,
    bundler: BundlerFlavor,
    output: OutputSettings,
    hot: bool,
    last_id: u64,
}

impl Compiler {
    /// Create a compiler with default output settings and hot updates on.
    #[must_use]
    pub fn new(bundler: BundlerFlavor) -> Self {
        Self {
            engine: HookEngine::default(),
            bundler,
            output: OutputSettings::default(),
            hot: true,
            last_id: 0,
        }
    }

    /// Create a compiler from loaded settings. Plugins are not applied.
    #[must_use]
    pub fn from_settings(settings: &SpliceSettings) -> Self {
        Self {
            output: settings.output.clone(),
            hot: settings.host.hot,
            ..Self::new(settings.bundler)
        }
    }

    /// Enable or disable hot-update wiring.
    #[must_use]
    pub fn with_hot(mut self, hot: bool) -> Self {
        self.hot = hot;
        self
    }

    /// Let a plugin register its handlers.
    pub fn apply(&mut self, plugin: &dyn Plugin) -> Result<()> {
        plugin
            .apply(self.engine.registry_mut())
            .map_err(|source| HostError::Plugin {
                name: plugin.name().to_string(),
                source,
            })?;
        debug!(plugin = %plugin.name(), "plugin applied");
        Ok(())
    }

    /// Bundler flavor.
    #[must_use]
    pub fn bundler(&self) -> BundlerFlavor {
        self.bundler
    }

    /// Whether hot-update wiring is on.
    #[must_use]
    pub fn is_hot(&self) -> bool {
        self.hot
    }

    /// The hook engine plugins registered on.
    #[must_use]
    pub fn engine(&self) -> &HookEngine {
        &self.engine
    }

    /// Run one compilation over `plan`.
    pub fn compile(&mut self, plan: &BuildPlan) -> Compilation {
        self.last_id += 1;
        let id = CompilationId::new(self.last_id);
        let _span = info_span!("compile", compilation = %id, bundler = %self.bundler).entered();

        let mut compilation = Compilation::new(id, self.bundler);
        let started = self
            .engine
            .call(&mut HookContext::ThisCompilation { compilation: id });
        debug!(handlers = started.invoked, failed = started.failed, "thisCompilation fired");

        for planned in plan.chunks() {
            let chunk = planned.chunk();
            let mut requirements = planned.requirements().clone();
            let added = wire_requirements(&mut requirements, planned.is_entry(), self.hot);
            compilation.add_chunk(
                chunk.clone(),
                self.output.render_filename(&chunk.display_name()),
                requirements.clone(),
            );
            debug!(chunk = %chunk.display_name(), requirements = requirements.len(), added, "resolving chunk runtime");

            for global in requirements.sorted() {
                let _ = self.engine.call(&mut HookContext::RuntimeRequirementInTree {
                    capability: global,
                    chunk,
                    requirements: &requirements,
                    sink: &mut compilation,
                });
            }
        }

        info!(
            chunks = plan.len(),
            fragments = compilation.fragment_count(),
            "compilation finished"
        );
        compilation
    }
}
