//! Per-run memo of version-control query results.
//!
//! One `ScopeCache` lives for one checking run. It is handed to the scope
//! resolver explicitly; there is no process-wide instance, so two runs in
//! the same process never see each other's results.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{AddedLineSet, ChangedFileSet, DiffScope};

/// In-memory cache for changed-file and added-line sets.
#[derive(Default)]
pub struct ScopeCache {
    changed: RwLock<HashMap<DiffScope, ChangedFileSet>>,
    added: RwLock<HashMap<(DiffScope, String), AddedLineSet>>,
}

impl ScopeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached changed-file set for `scope`, computing it on first use.
    pub fn changed_files_or_insert_with<F>(&self, scope: DiffScope, compute: F) -> ChangedFileSet
    where
        F: FnOnce() -> ChangedFileSet,
    {
        if let Ok(cache) = self.changed.read() {
            if let Some(set) = cache.get(&scope) {
                return set.clone();
            }
        }

        let set = compute();
        if let Ok(mut cache) = self.changed.write() {
            cache.insert(scope, set.clone());
        }
        set
    }

    /// Cached added-line set for `(scope, path)`, computing it on first use.
    pub fn added_lines_or_insert_with<F>(
        &self,
        scope: DiffScope,
        path: &str,
        compute: F,
    ) -> AddedLineSet
    where
        F: FnOnce() -> AddedLineSet,
    {
        let key = (scope, path.to_string());
        if let Ok(cache) = self.added.read() {
            if let Some(set) = cache.get(&key) {
                return set.clone();
            }
        }

        let set = compute();
        if let Ok(mut cache) = self.added.write() {
            cache.insert(key, set.clone());
        }
        set
    }

    /// Number of cached added-line sets.
    pub fn cached_files(&self) -> usize {
        self.added.read().map(|c| c.len()).unwrap_or(0)
    }
}
