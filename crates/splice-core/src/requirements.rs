//! Per-chunk runtime requirement sets.

use std::collections::HashSet;
use std::collections::hash_set;

use serde::{Deserialize, Serialize};

use crate::runtime_globals::RuntimeGlobal;

/// Unordered set of runtime globals the host accumulated for one chunk.
///
/// Iteration order is unspecified. Consumers that need a stable rendering
/// use [`sorted`](Self::sorted) or sort the rendered text themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeRequirements {
    globals: HashSet<RuntimeGlobal>,
}

impl RuntimeRequirements {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global. Returns `true` if it was not already present.
    pub fn insert(&mut self, global: RuntimeGlobal) -> bool {
        self.globals.insert(global)
    }

    /// Whether `global` is required.
    #[must_use]
    pub fn contains(&self, global: RuntimeGlobal) -> bool {
        self.globals.contains(&global)
    }

    /// Number of distinct globals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.globals.len()
    }

    /// Whether nothing is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    /// Iterate in unspecified order.
    pub fn iter(&self) -> hash_set::Iter<'_, RuntimeGlobal> {
        self.globals.iter()
    }

    /// Members sorted by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<RuntimeGlobal> {
        let mut globals: Vec<_> = self.globals.iter().copied().collect();
        globals.sort_unstable_by_key(|g| g.name());
        globals
    }
}

impl FromIterator<RuntimeGlobal> for RuntimeRequirements {
    fn from_iter<I: IntoIterator<Item = RuntimeGlobal>>(iter: I) -> Self {
        Self {
            globals: iter.into_iter().collect(),
        }
    }
}

impl Extend<RuntimeGlobal> for RuntimeRequirements {
    fn extend<I: IntoIterator<Item = RuntimeGlobal>>(&mut self, iter: I) {
        self.globals.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuntimeRequirements {
    type Item = &'a RuntimeGlobal;
    type IntoIter = hash_set::Iter<'a, RuntimeGlobal>;

    fn into_iter(self) -> Self::IntoIter {
        self.globals.iter()
    }
}
