use tracing::debug;

use crate::domain::module::{ModuleSettings, ModuleType};
use crate::domain::module_list::ModuleList;
use crate::observability;

/// A capability at most one module of a constrained pair may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ContactInfo,
}

/// Rule keyed by a pair of module types: while any `holder` module is in
/// the list, the `dependent` type's capability flag is forced off. The
/// holder wins because it is the module the user added to own the
/// capability; recency is implied by membership, not tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossModuleConstraint {
    pub holder: ModuleType,
    pub dependent: ModuleType,
    pub capability: Capability,
}

/// Cross-module constraint engine. Rule-based, not generic constraint
/// satisfaction: only the registered pairs are checked, every other type
/// combination is left untouched. Runs after membership changes
/// (add/remove); toggling or reordering never triggers it.
///
/// A forced-off flag is remembered as suppressed so that removing the last
/// holder restores it; a flag the user turned off themselves stays off.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    rules: Vec<CrossModuleConstraint>,
}

impl ConflictResolver {
    pub fn with_builtin_rules() -> Self {
        Self {
            rules: vec![CrossModuleConstraint {
                holder: ModuleType::ContactForm,
                dependent: ModuleType::PolicySection,
                capability: Capability::ContactInfo,
            }],
        }
    }

    /// Re-normalize the list against every rule. Idempotent; returns the
    /// number of settings adjusted. Never fails and never surfaces to the
    /// user: a conflict is resolved, not reported.
    pub fn resolve(&self, modules: &mut ModuleList) -> usize {
        let mut adjusted = 0;
        for rule in &self.rules {
            let holder_present = modules.contains_type(rule.holder);
            for module in modules
                .iter_mut()
                .filter(|m| m.module_type == rule.dependent)
            {
                match rule.capability {
                    Capability::ContactInfo => {
                        if let ModuleSettings::PolicySection(settings) = &mut module.settings {
                            if holder_present && settings.show_contact {
                                settings.show_contact = false;
                                settings.contact_suppressed = true;
                                adjusted += 1;
                                debug!(
                                    module_id = %module.id,
                                    "suppressed contact info on policy section"
                                );
                            } else if !holder_present && settings.contact_suppressed {
                                settings.show_contact = true;
                                settings.contact_suppressed = false;
                                adjusted += 1;
                                debug!(
                                    module_id = %module.id,
                                    "restored contact info on policy section"
                                );
                            }
                        }
                    }
                }
            }
        }
        if adjusted > 0 {
            observability::metrics::conflicts_resolved(adjusted);
        }
        adjusted
    }
}
