//! Process-wide registry of host packages that asked for reporting.
//!
//! Entries are only ever added, never removed. The first registration wins:
//! later registrations under the same name are no-ops and do not update the
//! stored version. The 0→1 size transition is the only observable event; it
//! gates scheduler startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::{shared, Shared};

/// Identity metadata supplied by a registering host package. Not validated:
/// garbage-valued fields propagate into report content as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: String,
}

#[derive(Clone)]
pub struct ModuleRegistry {
    modules: Shared<HashMap<String, ModuleDescriptor>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: shared(HashMap::new()),
        }
    }

    /// Insert a descriptor unless one with the same name already exists.
    /// Returns true only when this insertion made the registry non-empty for
    /// the first time. The check-then-insert runs under one lock.
    pub fn insert(&self, descriptor: ModuleDescriptor) -> bool {
        let mut modules = self.modules.lock();
        if modules.contains_key(&descriptor.name) {
            return false;
        }
        modules.insert(descriptor.name.clone(), descriptor);
        modules.len() == 1
    }

    pub fn len(&self) -> usize {
        self.modules.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.lock().is_empty()
    }

    pub fn get(&self, name: &str) -> Option<ModuleDescriptor> {
        self.modules.lock().get(name).cloned()
    }

    /// Live snapshot of the current entries, taken at call time.
    pub fn snapshot(&self) -> Vec<ModuleDescriptor> {
        self.modules.lock().values().cloned().collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, version: &str) -> ModuleDescriptor {
        ModuleDescriptor {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn first_insert_reports_transition() {
        let registry = ModuleRegistry::new();
        assert!(registry.insert(descriptor("foo", "1.0.0")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn later_modules_do_not_report_transition() {
        let registry = ModuleRegistry::new();
        assert!(registry.insert(descriptor("foo", "1.0.0")));
        assert!(!registry.insert(descriptor("bar", "2.0.0")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_name_is_a_noop_and_first_version_wins() {
        let registry = ModuleRegistry::new();
        assert!(registry.insert(descriptor("foo", "1.0.0")));
        assert!(!registry.insert(descriptor("foo", "9.9.9")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("foo").unwrap().version, "1.0.0");
    }

    #[test]
    fn snapshot_clones_current_entries() {
        let registry = ModuleRegistry::new();
        registry.insert(descriptor("foo", "1.0.0"));
        registry.insert(descriptor("bar", "0.3.1"));

        let mut names: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|module| module.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["bar".to_string(), "foo".to_string()]);
    }
}
