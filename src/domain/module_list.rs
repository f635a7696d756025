use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::module_registry::ModuleTemplate;
use crate::domain::module::{ModuleConfig, ModuleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered collection of module instances. Owns the dense-ordering
/// invariant: after every operation the `order` values are exactly
/// `0..n-1`, one per module, matching the storage order of the vec.
///
/// Operations are total: an unknown id is a no-op reported through the
/// return value, never a panic or an error crossing module boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleList {
    modules: Vec<ModuleConfig>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from persisted modules. Sorts by the stored `order`
    /// and reindexes densely, so a gappy or duplicated sequence from an old
    /// save is repaired on load.
    pub fn from_modules(mut modules: Vec<ModuleConfig>) -> Self {
        modules.sort_by_key(|m| m.order);
        let mut list = Self { modules };
        list.reindex();
        list
    }

    /// Instantiate a module from its template at the end of the list.
    /// Returns the generated id. The caller is responsible for running
    /// conflict resolution afterwards (membership changed).
    pub fn add(&mut self, template: &ModuleTemplate) -> String {
        let id = Uuid::new_v4().to_string();
        let module = ModuleConfig {
            id: id.clone(),
            module_type: template.module_type,
            title: template.name.to_string(),
            description: template.description.to_string(),
            icon: template.icon.to_string(),
            enabled: true,
            order: self.modules.len() as u32,
            settings: template.default_settings(),
        };
        self.modules.push(module);
        self.debug_assert_dense();
        id
    }

    /// Remove a module and close the gap: every module ordered after it
    /// shifts down by one, restoring a dense `0..n-2` sequence in the same
    /// step. Unknown id is a no-op returning false.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            warn!(module_id = %id, "remove: unknown module id");
            return false;
        };
        self.modules.remove(idx);
        self.reindex();
        true
    }

    /// Swap order with the adjacent module; no-op at the boundaries.
    pub fn move_module(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            warn!(module_id = %id, "move: unknown module id");
            return false;
        };
        let neighbor = match direction {
            MoveDirection::Up => {
                if idx == 0 {
                    return false;
                }
                idx - 1
            }
            MoveDirection::Down => {
                if idx + 1 >= self.modules.len() {
                    return false;
                }
                idx + 1
            }
        };
        let (a, b) = (self.modules[idx].order, self.modules[neighbor].order);
        self.modules[idx].order = b;
        self.modules[neighbor].order = a;
        self.modules.swap(idx, neighbor);
        self.debug_assert_dense();
        true
    }

    /// Flip `enabled`. Disabled modules keep their slot, so no reindexing.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(module) => {
                module.enabled = !module.enabled;
                true
            }
            None => {
                warn!(module_id = %id, "toggle: unknown module id");
                false
            }
        }
    }

    /// Shallow-merge a JSON object patch into the module's settings.
    /// `order` and `enabled` are untouchable through this path, and the
    /// reserved `enriched` key is ignored. A patch that is not an object or
    /// does not fit the module's settings shape is rejected as a no-op.
    pub fn update_settings(&mut self, id: &str, patch: &Value) -> bool {
        let Value::Object(patch) = patch else {
            warn!(module_id = %id, "update_settings: patch is not a JSON object");
            return false;
        };
        match self.find_mut(id) {
            Some(module) => module.settings.apply_patch(patch),
            None => {
                warn!(module_id = %id, "update_settings: unknown module id");
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.modules.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModuleConfig> {
        self.modules.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn contains_type(&self, module_type: ModuleType) -> bool {
        self.modules.iter().any(|m| m.module_type == module_type)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut ModuleConfig> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    fn reindex(&mut self) {
        for (i, module) in self.modules.iter_mut().enumerate() {
            module.order = i as u32;
        }
    }

    fn debug_assert_dense(&self) {
        debug_assert!(
            self.modules
                .iter()
                .enumerate()
                .all(|(i, m)| m.order == i as u32),
            "module orders must be a dense 0..n-1 permutation"
        );
    }
}
