use tracing::debug;

use crate::domain::module::{
    EnrichedCategories, EnrichedContact, EnrichedHours, EnrichedPayments, ModuleSettings,
};
use crate::domain::module_list::ModuleList;
use crate::domain::profile::StoreProfile;
use crate::observability;

/// Merges authoritative store-profile data into module settings. Runs once
/// per document load, after the profile has resolved.
///
/// Merge policy: each enrichable module type has a reserved `enriched`
/// sub-object that is replaced wholesale — it is a read-only projection of
/// upstream truth. Keys the user can hand-edit (headings, toggles, body
/// text) are never written. When the profile is unavailable the enricher
/// simply is not invoked and modules keep whatever enrichment data was
/// embedded at the last save.
#[derive(Debug, Clone, Default)]
pub struct DataEnricher;

impl DataEnricher {
    pub fn new() -> Self {
        Self
    }

    /// Project the profile into every enrichable module. Returns the number
    /// of modules enriched.
    pub fn enrich(&self, modules: &mut ModuleList, profile: &StoreProfile) -> usize {
        let contact = self.contact_projection(profile);
        let hours = EnrichedHours {
            hours: profile.open_hours.clone(),
        };
        let payments = EnrichedPayments {
            methods: profile
                .payment_methods
                .iter()
                .filter(|m| m.enabled)
                .map(|m| m.name.clone())
                .collect(),
        };
        let categories = EnrichedCategories {
            categories: profile.categories.iter().map(|c| c.name.clone()).collect(),
        };

        let mut enriched = 0;
        for module in modules.iter_mut() {
            let applied = match &mut module.settings {
                ModuleSettings::ContactForm(s) => {
                    s.enriched = Some(contact.clone());
                    true
                }
                ModuleSettings::PolicySection(s) => {
                    s.enriched = Some(contact.clone());
                    true
                }
                ModuleSettings::BusinessHours(s) => {
                    s.enriched = Some(hours.clone());
                    true
                }
                ModuleSettings::PaymentMethods(s) => {
                    s.enriched = Some(payments.clone());
                    true
                }
                ModuleSettings::CategoryShowcase(s) => {
                    s.enriched = Some(categories.clone());
                    true
                }
                _ => false,
            };
            if applied {
                debug!(module_id = %module.id, module_type = %module.module_type, "module enriched");
                enriched += 1;
            }
        }
        observability::metrics::enrichment_applied(enriched);
        enriched
    }

    fn contact_projection(&self, profile: &StoreProfile) -> EnrichedContact {
        EnrichedContact {
            email: profile.contact_email.clone(),
            phone: profile.contact_phone.clone(),
            address: profile.primary_address().map(|a| a.display_line()),
        }
    }
}
