//! Hook plugin wiring the coordinator into a host.
//!
//! [`RuntimeInjectionPlugin::apply`] registers one handler on
//! `thisCompilation` and one handler per configured capability on
//! `runtimeRequirementInTree`. All of them share a single
//! [`InjectionCoordinator`].

use std::sync::Arc;

use parking_lot::Mutex;
use splice_core::RuntimeGlobal;
use splice_hooks::{HookContext, HookError, HookHandler, HookKey, HookRegistry};
use splice_settings::InjectionSettings;
use tracing::debug;

use crate::coordinator::InjectionCoordinator;
use crate::generator::{FragmentGenerator, RequirementLogGenerator};

/// Injects one runtime fragment per chunk that needs any of its capabilities.
///
/// Cloning yields an independent plugin: same name, capabilities and
/// generator, but its own [`InjectionCoordinator`]. Apply a clone to each
/// compiler that needs one.
pub struct RuntimeInjectionPlugin {
    name: String,
    capabilities: Vec<RuntimeGlobal>,
    generator: Arc<dyn FragmentGenerator>,
    coordinator: Arc<Mutex<InjectionCoordinator>>,
}

impl RuntimeInjectionPlugin {
    /// Create a plugin watching `capabilities` and injecting what `generator` produces.
    ///
    /// Duplicate capabilities are collapsed.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        capabilities: impl IntoIterator<Item = RuntimeGlobal>,
        generator: Arc<dyn FragmentGenerator>,
    ) -> Self {
        let mut unique: Vec<RuntimeGlobal> = Vec::new();
        for capability in capabilities {
            if !unique.contains(&capability) {
                unique.push(capability);
            }
        }
        Self {
            name: name.into(),
            capabilities: unique,
            coordinator: Arc::new(Mutex::new(InjectionCoordinator::new(Arc::clone(&generator)))),
            generator,
        }
    }

    /// Build the plugin and its generator from settings.
    #[must_use]
    pub fn from_settings(settings: &InjectionSettings) -> Self {
        let generator = RequirementLogGenerator::new(settings.module_name.clone())
            .with_stage(settings.stage)
            .with_format(settings.format);
        Self::new(
            settings.plugin_name.clone(),
            settings.capabilities.iter().copied(),
            Arc::new(generator),
        )
    }

    /// Register the plugin's handlers.
    ///
    /// Fails if a handler with the plugin's name is already registered on
    /// one of the hooks; the plugin must be applied once per host.
    pub fn apply(&self, registry: &mut HookRegistry) -> Result<(), HookError> {
        registry.try_register(Arc::new(CompilationStartTap {
            name: self.name.clone(),
            coordinator: Arc::clone(&self.coordinator),
        }))?;

        for capability in &self.capabilities {
            registry.try_register(Arc::new(RequirementTap {
                name: self.name.clone(),
                capability: *capability,
                coordinator: Arc::clone(&self.coordinator),
            }))?;
        }

        debug!(
            plugin = %self.name,
            capabilities = ?self.capabilities,
            "runtime injection plugin applied"
        );
        Ok(())
    }

    /// Plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities that trigger injection.
    #[must_use]
    pub fn capabilities(&self) -> &[RuntimeGlobal] {
        &self.capabilities
    }

    /// Shared coordinator state.
    #[must_use]
    pub fn coordinator(&self) -> Arc<Mutex<InjectionCoordinator>> {
        Arc::clone(&self.coordinator)
    }
}

impl Default for RuntimeInjectionPlugin {
    fn default() -> Self {
        Self::from_settings(&InjectionSettings::default())
    }
}

impl Clone for RuntimeInjectionPlugin {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            capabilities: self.capabilities.clone(),
            generator: Arc::clone(&self.generator),
            coordinator: Arc::new(Mutex::new(InjectionCoordinator::new(Arc::clone(
                &self.generator,
            )))),
        }
    }
}

impl std::fmt::Debug for RuntimeInjectionPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeInjectionPlugin")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

struct CompilationStartTap {
    name: String,
    coordinator: Arc<Mutex<InjectionCoordinator>>,
}

impl HookHandler for CompilationStartTap {
    fn name(&self) -> &str {
        &self.name
    }

    fn hook_key(&self) -> HookKey {
        HookKey::ThisCompilation
    }

    fn description(&self) -> Option<&str> {
        Some("reset seen chunks")
    }

    fn handle(&self, context: &mut HookContext<'_>) -> Result<(), HookError> {
        match context {
            HookContext::ThisCompilation { .. } => {
                self.coordinator.lock().on_compilation_start();
                Ok(())
            }
            HookContext::RuntimeRequirementInTree { capability, .. } => {
                Err(HookError::UnexpectedContext {
                    name: self.name.clone(),
                    hook: HookKey::RuntimeRequirementInTree(*capability).to_string(),
                })
            }
        }
    }
}

struct RequirementTap {
    name: String,
    capability: RuntimeGlobal,
    coordinator: Arc<Mutex<InjectionCoordinator>>,
}

impl HookHandler for RequirementTap {
    fn name(&self) -> &str {
        &self.name
    }

    fn hook_key(&self) -> HookKey {
        HookKey::RuntimeRequirementInTree(self.capability)
    }

    fn description(&self) -> Option<&str> {
        Some("inject runtime fragment once per chunk")
    }

    fn handle(&self, context: &mut HookContext<'_>) -> Result<(), HookError> {
        match context {
            HookContext::RuntimeRequirementInTree {
                capability,
                chunk,
                requirements,
                sink,
            } => {
                let _ = self.coordinator.lock().on_requirement_observed(
                    *capability,
                    *chunk,
                    *requirements,
                    &mut **sink,
                );
                Ok(())
            }
            HookContext::ThisCompilation { .. } => Err(HookError::UnexpectedContext {
                name: self.name.clone(),
                hook: HookKey::ThisCompilation.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use splice_core::{Chunk, ChunkUkey, RuntimeFragment, RuntimeModuleStage, RuntimeRequirements};
    use splice_hooks::{CompilationId, HookEngine};

    use super::*;

    type Delivered = Vec<(ChunkUkey, RuntimeFragment)>;

    fn requirement(
        engine: &HookEngine,
        capability: RuntimeGlobal,
        chunk: &Chunk,
        requirements: &RuntimeRequirements,
        sink: &mut Delivered,
    ) {
        let _ = engine.call(&mut HookContext::RuntimeRequirementInTree {
            capability,
            chunk,
            requirements,
            sink,
        });
    }

    fn start(engine: &HookEngine, id: u64) {
        let _ = engine.call(&mut HookContext::ThisCompilation {
            compilation: CompilationId::new(id),
        });
    }

    fn applied(plugin: &RuntimeInjectionPlugin) -> HookEngine {
        let mut engine = HookEngine::default();
        plugin.apply(engine.registry_mut()).unwrap();
        engine
    }

    #[test]
    fn apply_registers_start_and_each_capability() {
        let plugin = RuntimeInjectionPlugin::default();
        let engine = applied(&plugin);
        let registry = engine.registry();

        assert_eq!(registry.count(), 3);
        assert!(registry.is_subscribed(HookKey::ThisCompilation));
        assert!(registry.is_subscribed(HookKey::RuntimeRequirementInTree(
            RuntimeGlobal::EnsureChunkHandlers
        )));
        assert!(registry.is_subscribed(HookKey::RuntimeRequirementInTree(
            RuntimeGlobal::HmrDownloadUpdateHandlers
        )));
        assert!(!registry.is_subscribed(HookKey::RuntimeRequirementInTree(
            RuntimeGlobal::LoadScript
        )));
    }

    #[test]
    fn apply_twice_is_rejected() {
        let plugin = RuntimeInjectionPlugin::default();
        let mut engine = applied(&plugin);
        assert_matches!(
            plugin.apply(engine.registry_mut()),
            Err(HookError::Registration(_))
        );
    }

    #[test]
    fn duplicate_capabilities_collapse() {
        let plugin = RuntimeInjectionPlugin::new(
            "dup",
            [
                RuntimeGlobal::EnsureChunkHandlers,
                RuntimeGlobal::EnsureChunkHandlers,
            ],
            Arc::new(RequirementLogGenerator::default()),
        );
        assert_eq!(plugin.capabilities(), &[RuntimeGlobal::EnsureChunkHandlers]);
        let engine = applied(&plugin);
        assert_eq!(engine.registry().count(), 2);
    }

    #[test]
    fn both_capabilities_on_one_chunk_inject_once() {
        let plugin = RuntimeInjectionPlugin::default();
        let engine = applied(&plugin);
        let chunk = Chunk::new("main");
        let requirements: RuntimeRequirements = [
            RuntimeGlobal::EnsureChunkHandlers,
            RuntimeGlobal::HmrDownloadUpdateHandlers,
        ]
        .into_iter()
        .collect();
        let mut sink = Delivered::new();

        start(&engine, 1);
        requirement(&engine, RuntimeGlobal::EnsureChunkHandlers, &chunk, &requirements, &mut sink);
        requirement(
            &engine,
            RuntimeGlobal::HmrDownloadUpdateHandlers,
            &chunk,
            &requirements,
            &mut sink,
        );

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].1.name, "chunk loading runtime");
        assert_eq!(sink[0].1.stage, RuntimeModuleStage::Attach);
        assert_eq!(
            sink[0].1.source,
            r#"console.log(["ensureChunkHandlers","hmrDownloadUpdateHandlers"])"#
        );
    }

    #[test]
    fn unwatched_capability_never_reaches_plugin() {
        let plugin = RuntimeInjectionPlugin::default();
        let engine = applied(&plugin);
        let chunk = Chunk::new("main");
        let requirements: RuntimeRequirements = [RuntimeGlobal::PublicPath].into_iter().collect();
        let mut sink = Delivered::new();

        start(&engine, 1);
        requirement(&engine, RuntimeGlobal::PublicPath, &chunk, &requirements, &mut sink);

        assert!(sink.is_empty());
        assert_eq!(plugin.coordinator().lock().injected_count(), 0);
    }

    #[test]
    fn new_compilation_reinjects() {
        let plugin = RuntimeInjectionPlugin::default();
        let engine = applied(&plugin);
        let chunk = Chunk::new("main");
        let requirements: RuntimeRequirements =
            [RuntimeGlobal::EnsureChunkHandlers].into_iter().collect();
        let mut sink = Delivered::new();

        start(&engine, 1);
        requirement(&engine, RuntimeGlobal::EnsureChunkHandlers, &chunk, &requirements, &mut sink);
        start(&engine, 2);
        requirement(&engine, RuntimeGlobal::EnsureChunkHandlers, &chunk, &requirements, &mut sink);

        assert_eq!(sink.len(), 2);
        assert_eq!(plugin.coordinator().lock().generation(), 2);
    }

    #[test]
    fn from_settings_applies_format_and_stage() {
        let settings = InjectionSettings {
            plugin_name: "custom".to_string(),
            module_name: "custom runtime".to_string(),
            stage: RuntimeModuleStage::Trigger,
            capabilities: vec![RuntimeGlobal::LoadScript],
            format: splice_core::FragmentFormat::Expressions,
        };
        let plugin = RuntimeInjectionPlugin::from_settings(&settings);
        assert_eq!(plugin.name(), "custom");

        let engine = applied(&plugin);
        let chunk = Chunk::new("async");
        let requirements: RuntimeRequirements = [RuntimeGlobal::LoadScript].into_iter().collect();
        let mut sink = Delivered::new();

        start(&engine, 1);
        requirement(&engine, RuntimeGlobal::LoadScript, &chunk, &requirements, &mut sink);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].1.name, "custom runtime");
        assert_eq!(sink[0].1.stage, RuntimeModuleStage::Trigger);
        assert_eq!(sink[0].1.source, r#"console.log(["__webpack_require__.l"])"#);
    }

    #[test]
    fn mismatched_context_is_an_error() {
        let tap = RequirementTap {
            name: "tap".to_string(),
            capability: RuntimeGlobal::EnsureChunkHandlers,
            coordinator: Arc::new(Mutex::new(InjectionCoordinator::default())),
        };
        let result = tap.handle(&mut HookContext::ThisCompilation {
            compilation: CompilationId::new(1),
        });
        assert_matches!(result, Err(HookError::UnexpectedContext { hook, .. }) if hook == "thisCompilation");
    }

    #[test]
    fn clone_gets_its_own_coordinator() {
        let plugin = RuntimeInjectionPlugin::default();
        let copy = plugin.clone();
        assert_eq!(copy.name(), plugin.name());
        assert_eq!(copy.capabilities(), plugin.capabilities());
        assert!(!Arc::ptr_eq(&copy.coordinator(), &plugin.coordinator()));

        let engine = applied(&copy);
        start(&engine, 1);
        assert_eq!(copy.coordinator().lock().generation(), 1);
        assert_eq!(plugin.coordinator().lock().generation(), 0);
    }

    #[test]
    fn list_all_shows_descriptions() {
        let plugin = RuntimeInjectionPlugin::default();
        let engine = applied(&plugin);
        let infos = engine.registry().list_all();
        assert_eq!(infos.len(), 3);
        assert!(infos.iter().all(|info| info.name == "runtime-injection"));
        assert!(infos
            .iter()
            .any(|info| info.description.as_deref() == Some("reset seen chunks")));
    }
}
