//! Hook dispatch engine.
//!
//! Runs every handler subscribed to a context's hook, in priority order.
//!
//! # Fail-Open
//!
//! Handler errors never abort a compilation. They are logged at `warn` and
//! the remaining handlers still run.

use tracing::{debug, instrument, warn};

use crate::registry::HookRegistry;
use crate::types::{HookContext, HookOutcome};

/// Hook dispatch engine. Owns the [`HookRegistry`].
#[derive(Debug, Default)]
pub struct HookEngine {
    registry: HookRegistry,
}

impl HookEngine {
    /// Create an engine over an existing registry.
    #[must_use]
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry }
    }

    /// Read access to the registry.
    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Write access to the registry, for plugins registering handlers.
    pub fn registry_mut(&mut self) -> &mut HookRegistry {
        &mut self.registry
    }

    /// Call every handler subscribed to the context's hook.
    #[instrument(skip_all, fields(hook = %context.hook_key()))]
    pub fn call(&self, context: &mut HookContext<'_>) -> HookOutcome {
        let handlers = self.registry.get_handlers(context.hook_key());
        let mut outcome = HookOutcome::default();

        for handler in &handlers {
            if !handler.should_handle(context) {
                debug!(name = %handler.name(), "Hook skipped by filter");
                outcome.skipped += 1;
                continue;
            }

            match handler.handle(context) {
                Ok(()) => outcome.invoked += 1,
                Err(error) => {
                    warn!(name = %handler.name(), error = %error, "Hook handler failed, continuing");
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use splice_core::{
        Chunk, ChunkUkey, RuntimeFragment, RuntimeGlobal, RuntimeModuleStage, RuntimeRequirements,
    };
    use splice_logging::capture_logs;
    use tracing::Level;

    use super::*;
    use crate::errors::HookError;
    use crate::handler::HookHandler;
    use crate::types::{CompilationId, HookKey};

    #[derive(Default)]
    struct CallLog(Mutex<Vec<&'static str>>);

    impl CallLog {
        fn push(&self, name: &'static str) {
            self.0.lock().unwrap().push(name);
        }

        fn take(&self) -> Vec<&'static str> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    struct Recorder {
        name: &'static str,
        hook_key: HookKey,
        priority: i32,
        calls: Arc<CallLog>,
        fail: bool,
        skip: bool,
    }

    impl HookHandler for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn hook_key(&self) -> HookKey {
            self.hook_key
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn should_handle(&self, _context: &HookContext<'_>) -> bool {
            !self.skip
        }
        fn handle(&self, context: &mut HookContext<'_>) -> Result<(), HookError> {
            self.calls.push(self.name);
            if self.fail {
                return Err(HookError::HandlerError {
                    name: self.name.to_string(),
                    message: "boom".to_string(),
                });
            }
            if let HookContext::RuntimeRequirementInTree { chunk, sink, .. } = context {
                sink.attach_runtime_fragment(
                    chunk.ukey(),
                    RuntimeFragment::new(self.name, RuntimeModuleStage::Attach, ""),
                );
            }
            Ok(())
        }
    }

    fn recorder(
        name: &'static str,
        hook_key: HookKey,
        priority: i32,
        order: &Arc<CallLog>,
    ) -> Recorder {
        Recorder {
            name,
            hook_key,
            priority,
            calls: Arc::clone(order),
            fail: false,
            skip: false,
        }
    }

    fn start(id: u64) -> HookContext<'static> {
        HookContext::ThisCompilation {
            compilation: CompilationId::new(id),
        }
    }

    #[test]
    fn call_without_handlers_is_noop() {
        let engine = HookEngine::default();
        assert_eq!(engine.call(&mut start(1)), HookOutcome::default());
    }

    #[test]
    fn call_runs_in_priority_order() {
        let order = Arc::new(CallLog::default());
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(recorder("low", HookKey::ThisCompilation, 1, &order)));
        registry.register(Arc::new(recorder("high", HookKey::ThisCompilation, 9, &order)));
        let engine = HookEngine::new(registry);

        let outcome = engine.call(&mut start(1));
        assert_eq!(outcome.invoked, 2);
        assert_eq!(order.take(), vec!["high", "low"]);
    }

    #[test]
    fn call_only_reaches_matching_key() {
        let order = Arc::new(CallLog::default());
        let mut engine = HookEngine::default();
        engine.registry_mut().register(Arc::new(recorder(
            "ensure",
            HookKey::RuntimeRequirementInTree(RuntimeGlobal::EnsureChunkHandlers),
            0,
            &order,
        )));
        engine.registry_mut().register(Arc::new(recorder(
            "hmr",
            HookKey::RuntimeRequirementInTree(RuntimeGlobal::HmrDownloadUpdateHandlers),
            0,
            &order,
        )));

        let chunk = Chunk::new("main");
        let requirements: RuntimeRequirements =
            [RuntimeGlobal::EnsureChunkHandlers].into_iter().collect();
        let mut sink: Vec<(ChunkUkey, RuntimeFragment)> = Vec::new();
        let outcome = engine.call(&mut HookContext::RuntimeRequirementInTree {
            capability: RuntimeGlobal::EnsureChunkHandlers,
            chunk: &chunk,
            requirements: &requirements,
            sink: &mut sink,
        });

        assert_eq!(outcome.invoked, 1);
        assert_eq!(order.take(), vec!["ensure"]);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].0, chunk.ukey());
    }

    #[test]
    fn failing_handler_does_not_stop_others() {
        let (logs, _guard) = capture_logs();
        let order = Arc::new(CallLog::default());
        let mut registry = HookRegistry::new();
        let mut failing = recorder("failing", HookKey::ThisCompilation, 10, &order);
        failing.fail = true;
        registry.register(Arc::new(failing));
        registry.register(Arc::new(recorder("after", HookKey::ThisCompilation, 0, &order)));
        let engine = HookEngine::new(registry);

        let outcome = engine.call(&mut start(2));
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.invoked, 1);
        assert_eq!(order.take(), vec!["failing", "after"]);
        assert!(logs.has_event(Level::WARN, "Hook handler failed"));
    }

    #[test]
    fn filtered_handler_is_skipped() {
        let order = Arc::new(CallLog::default());
        let mut registry = HookRegistry::new();
        let mut skipped = recorder("skipped", HookKey::ThisCompilation, 0, &order);
        skipped.skip = true;
        registry.register(Arc::new(skipped));
        let engine = HookEngine::new(registry);

        let outcome = engine.call(&mut start(3));
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.invoked, 0);
        assert!(order.take().is_empty());
    }
}
