#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use splice_core::{
    Chunk, ChunkUkey, FragmentSink, RuntimeFragment, RuntimeGlobal, RuntimeRequirements,
};
use splice_hooks::{CompilationId, HookContext, HookEngine, HookError, HookHandler, HookKey};
use splice_inject::{FragmentGenerator, RequirementLogGenerator, RuntimeInjectionPlugin};
use splice_logging::capture_logs;
use tracing::Level;

#[derive(Default)]
struct ChunkOutputs(HashMap<ChunkUkey, Vec<RuntimeFragment>>);

impl FragmentSink for ChunkOutputs {
    fn attach_runtime_fragment(&mut self, chunk: ChunkUkey, fragment: RuntimeFragment) {
        self.0.entry(chunk).or_default().push(fragment);
    }
}

impl ChunkOutputs {
    fn sources(&self, chunk: &Chunk) -> Vec<&str> {
        self.0
            .get(&chunk.ukey())
            .map(|fragments| fragments.iter().map(|f| f.source.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Fires requirement hooks the way a bundler does: once per global, always
/// with the chunk's full set.
fn resolve_chunk(
    engine: &HookEngine,
    chunk: &Chunk,
    globals: &[RuntimeGlobal],
    outputs: &mut ChunkOutputs,
) {
    let requirements: RuntimeRequirements = globals.iter().copied().collect();
    for global in requirements.sorted() {
        let _ = engine.call(&mut HookContext::RuntimeRequirementInTree {
            capability: global,
            chunk,
            requirements: &requirements,
            sink: &mut *outputs,
        });
    }
}

fn start(engine: &HookEngine, id: u64) {
    let _ = engine.call(&mut HookContext::ThisCompilation {
        compilation: CompilationId::new(id),
    });
}

fn engine_with(plugin: &RuntimeInjectionPlugin) -> HookEngine {
    let mut engine = HookEngine::default();
    plugin.apply(engine.registry_mut()).unwrap();
    engine
}

#[test]
fn mixed_chunks_in_one_compilation() {
    let plugin = RuntimeInjectionPlugin::default();
    let engine = engine_with(&plugin);
    let main = Chunk::new("main");
    let lazy = Chunk::new("lazy");
    let plain = Chunk::anonymous();
    let mut outputs = ChunkOutputs::default();

    start(&engine, 1);
    resolve_chunk(
        &engine,
        &main,
        &[
            RuntimeGlobal::EnsureChunk,
            RuntimeGlobal::EnsureChunkHandlers,
            RuntimeGlobal::HmrDownloadUpdateHandlers,
        ],
        &mut outputs,
    );
    resolve_chunk(
        &engine,
        &lazy,
        &[RuntimeGlobal::EnsureChunkHandlers, RuntimeGlobal::LoadScript],
        &mut outputs,
    );
    resolve_chunk(&engine, &plain, &[RuntimeGlobal::PublicPath], &mut outputs);

    assert_eq!(
        outputs.sources(&main),
        vec![r#"console.log(["ensureChunk","ensureChunkHandlers","hmrDownloadUpdateHandlers"])"#]
    );
    assert_eq!(
        outputs.sources(&lazy),
        vec![r#"console.log(["ensureChunkHandlers","loadScript"])"#]
    );
    assert!(outputs.sources(&plain).is_empty());
    assert_eq!(plugin.coordinator().lock().injected_count(), 2);
}

#[test]
fn rebuilds_inject_again() {
    let plugin = RuntimeInjectionPlugin::default();
    let engine = engine_with(&plugin);
    let main = Chunk::new("main");
    let mut outputs = ChunkOutputs::default();

    for id in 1..=3 {
        start(&engine, id);
        resolve_chunk(
            &engine,
            &main,
            &[RuntimeGlobal::EnsureChunkHandlers, RuntimeGlobal::HmrDownloadUpdateHandlers],
            &mut outputs,
        );
        resolve_chunk(
            &engine,
            &main,
            &[RuntimeGlobal::EnsureChunkHandlers, RuntimeGlobal::HmrDownloadUpdateHandlers],
            &mut outputs,
        );
    }

    assert_eq!(outputs.sources(&main).len(), 3);
    assert_eq!(plugin.coordinator().lock().generation(), 3);
}

#[test]
fn two_plugins_keep_separate_state() {
    let ensure_only = RuntimeInjectionPlugin::new(
        "ensure-only",
        [RuntimeGlobal::EnsureChunkHandlers],
        Arc::new(RequirementLogGenerator::new("ensure runtime")),
    );
    let hmr_only = RuntimeInjectionPlugin::new(
        "hmr-only",
        [RuntimeGlobal::HmrDownloadUpdateHandlers],
        Arc::new(RequirementLogGenerator::new("hmr runtime")),
    );
    let mut engine = HookEngine::default();
    ensure_only.apply(engine.registry_mut()).unwrap();
    hmr_only.apply(engine.registry_mut()).unwrap();

    let main = Chunk::new("main");
    let mut outputs = ChunkOutputs::default();
    start(&engine, 1);
    resolve_chunk(
        &engine,
        &main,
        &[RuntimeGlobal::EnsureChunkHandlers, RuntimeGlobal::HmrDownloadUpdateHandlers],
        &mut outputs,
    );

    let names: Vec<&str> = outputs.0[&main.ukey()].iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["ensure runtime", "hmr runtime"]);
}

struct Exploding;

impl HookHandler for Exploding {
    fn name(&self) -> &str {
        "exploding"
    }

    fn hook_key(&self) -> HookKey {
        HookKey::RuntimeRequirementInTree(RuntimeGlobal::EnsureChunkHandlers)
    }

    fn priority(&self) -> i32 {
        100
    }

    fn handle(&self, _context: &mut HookContext<'_>) -> Result<(), HookError> {
        Err(HookError::HandlerError {
            name: "exploding".to_string(),
            message: "always fails".to_string(),
        })
    }
}

#[test]
fn failing_neighbour_does_not_block_injection() {
    let (logs, _guard) = capture_logs();
    let plugin = RuntimeInjectionPlugin::default();
    let mut engine = engine_with(&plugin);
    engine.registry_mut().register(Arc::new(Exploding));

    let main = Chunk::new("main");
    let mut outputs = ChunkOutputs::default();
    start(&engine, 1);
    resolve_chunk(&engine, &main, &[RuntimeGlobal::EnsureChunkHandlers], &mut outputs);

    assert_eq!(outputs.sources(&main).len(), 1);
    assert!(logs.has_event(Level::WARN, "Hook handler failed"));
}

struct Fixed;

impl FragmentGenerator for Fixed {
    fn generate(&self, _requirements: &RuntimeRequirements) -> RuntimeFragment {
        RuntimeFragment::new("fixed", splice_core::RuntimeModuleStage::Normal, "void 0")
    }
}

#[test]
fn custom_generator_is_used() {
    let plugin = RuntimeInjectionPlugin::new(
        "fixed",
        [RuntimeGlobal::EnsureChunkHandlers],
        Arc::new(Fixed),
    );
    let engine = engine_with(&plugin);
    let main = Chunk::new("main");
    let mut outputs = ChunkOutputs::default();

    start(&engine, 1);
    resolve_chunk(&engine, &main, &[RuntimeGlobal::EnsureChunkHandlers], &mut outputs);

    assert_eq!(outputs.sources(&main), vec!["void 0"]);
}

#[test]
fn cloned_plugin_on_second_engine_keeps_first_compilation_intact() {
    let plugin = RuntimeInjectionPlugin::default();
    let first = engine_with(&plugin);
    let second = engine_with(&plugin.clone());

    let main = Chunk::new("main");
    let requirements: RuntimeRequirements = [
        RuntimeGlobal::EnsureChunkHandlers,
        RuntimeGlobal::HmrDownloadUpdateHandlers,
    ]
    .into_iter()
    .collect();
    let mut first_outputs = ChunkOutputs::default();
    let mut second_outputs = ChunkOutputs::default();

    let notify = |engine: &HookEngine, capability: RuntimeGlobal, outputs: &mut ChunkOutputs| {
        let _ = engine.call(&mut HookContext::RuntimeRequirementInTree {
            capability,
            chunk: &main,
            requirements: &requirements,
            sink: outputs,
        });
    };

    start(&first, 1);
    notify(&first, RuntimeGlobal::EnsureChunkHandlers, &mut first_outputs);
    start(&second, 1);
    notify(&first, RuntimeGlobal::HmrDownloadUpdateHandlers, &mut first_outputs);
    notify(&second, RuntimeGlobal::EnsureChunkHandlers, &mut second_outputs);
    notify(&second, RuntimeGlobal::HmrDownloadUpdateHandlers, &mut second_outputs);

    assert_eq!(first_outputs.sources(&main).len(), 1);
    assert_eq!(second_outputs.sources(&main).len(), 1);
}
