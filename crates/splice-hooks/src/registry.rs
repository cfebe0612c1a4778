//! Hook registry.
//!
//! Maintains a priority-sorted collection of [`HookHandler`] instances per
//! [`HookKey`]. The registry is the source of truth for which handlers are
//! subscribed and in what order they run.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::HookError;
use crate::handler::HookHandler;
use crate::types::{HookInfo, HookKey};

/// Registry of compilation hook handlers.
///
/// Handlers are organized by [`HookKey`] and sorted by priority (descending)
/// within each key. Registration order breaks ties.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookKey, Vec<Arc<dyn HookHandler>>>,
}

impl HookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Register a hook handler.
    ///
    /// A handler with the same name on the same key is replaced.
    pub fn register(&mut self, handler: Arc<dyn HookHandler>) {
        let hook_key = handler.hook_key();
        let name = handler.name().to_string();

        let handlers = self.hooks.entry(hook_key).or_default();
        handlers.retain(|h| h.name() != name);

        debug!(name = %name, hook = %hook_key, priority = handler.priority(), "Registering hook");
        handlers.push(handler);

        // stable sort keeps registration order among equal priorities
        handlers.sort_by_key(|h| std::cmp::Reverse(h.priority()));
    }

    /// Register a handler, failing if its name is already taken on its key.
    pub fn try_register(&mut self, handler: Arc<dyn HookHandler>) -> Result<(), HookError> {
        let hook_key = handler.hook_key();
        let taken = self
            .hooks
            .get(&hook_key)
            .is_some_and(|handlers| handlers.iter().any(|h| h.name() == handler.name()));
        if taken {
            return Err(HookError::Registration(format!(
                "'{}' is already registered on {hook_key}",
                handler.name()
            )));
        }
        self.register(handler);
        Ok(())
    }

    /// Unregister a handler by name from every key.
    ///
    /// Returns `true` if anything was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let mut found = false;
        for handlers in self.hooks.values_mut() {
            let before_len = handlers.len();
            handlers.retain(|h| h.name() != name);
            if handlers.len() < before_len {
                found = true;
            }
        }
        self.hooks.retain(|_, handlers| !handlers.is_empty());
        if found {
            debug!(name = %name, "Unregistered hook");
        }
        found
    }

    /// Handlers for a key, highest priority first.
    #[must_use]
    pub fn get_handlers(&self, hook_key: HookKey) -> Vec<Arc<dyn HookHandler>> {
        self.hooks.get(&hook_key).cloned().unwrap_or_default()
    }

    /// Whether any handler is subscribed to `hook_key`.
    #[must_use]
    pub fn is_subscribed(&self, hook_key: HookKey) -> bool {
        self.hooks.get(&hook_key).is_some_and(|h| !h.is_empty())
    }

    /// List information about all registered handlers, sorted by name then key.
    #[must_use]
    pub fn list_all(&self) -> Vec<HookInfo> {
        let mut infos: Vec<HookInfo> = self
            .hooks
            .values()
            .flatten()
            .map(|handler| HookInfo {
                name: handler.name().to_string(),
                hook_key: handler.hook_key(),
                priority: handler.priority(),
                description: handler.description().map(ToString::to_string),
            })
            .collect();
        infos.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.hook_key.to_string().cmp(&b.hook_key.to_string()))
        });
        infos
    }

    /// First handler found with the given name, on any key.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn HookHandler>> {
        self.hooks
            .values()
            .flatten()
            .find(|h| h.name() == name)
            .map(Arc::clone)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    /// Remove every registration.
    pub fn clear(&mut self) {
        self.hooks.clear();
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hook_count", &self.count())
            .finish()
    }
}
