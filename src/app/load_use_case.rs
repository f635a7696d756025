use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::app::ports::{CustomizationGateway, StoreProfileGateway};
use crate::app::session::EditorSession;
use crate::catalog::module_registry::ModuleRegistry;
use crate::catalog::theme_catalog::ThemeCatalog;
use crate::composer::theme_engine;
use crate::domain::document::CustomizationDocument;
use crate::domain::module::ModuleType;
use crate::error::Result;

/// Module set a brand-new store starts with.
const STARTER_MODULES: [ModuleType; 3] = [
    ModuleType::HeroBanner,
    ModuleType::FeaturedProducts,
    ModuleType::ContactForm,
];

/// Builds an editing session: loads the persisted document (or assembles
/// the first-time default), re-normalizes cross-module constraints, and
/// runs the one-shot profile enrichment.
pub struct LoadWorkflow<'a> {
    gateway: &'a dyn CustomizationGateway,
    profiles: &'a dyn StoreProfileGateway,
}

impl<'a> LoadWorkflow<'a> {
    pub fn new(
        gateway: &'a dyn CustomizationGateway,
        profiles: &'a dyn StoreProfileGateway,
    ) -> Self {
        Self { gateway, profiles }
    }

    #[instrument(skip(self, registry, themes))]
    pub async fn load(
        &self,
        store_id: i64,
        registry: Arc<ModuleRegistry>,
        themes: Arc<ThemeCatalog>,
    ) -> Result<EditorSession> {
        let document = match self.gateway.load(store_id).await? {
            Some(persisted) => {
                info!("loaded persisted customization");
                persisted.into_document(&registry)
            }
            None => {
                info!("no persisted customization, building first-time default");
                default_document(store_id, &registry, &themes)
            }
        };

        let mut session = EditorSession::new(document, registry, themes);
        session.resolve_conflicts();

        // Enrichment is best-effort: a failed profile fetch never blocks
        // editing, the modules keep whatever enrichment data they carried.
        let generation = session.load_generation();
        match self.profiles.comprehensive_details(store_id).await {
            Ok(profile) => {
                session.apply_enrichment(&profile, generation);
            }
            Err(e) => {
                warn!(error = %e, "store profile unavailable, enrichment skipped");
            }
        }

        Ok(session)
    }
}

fn default_document(
    store_id: i64,
    registry: &ModuleRegistry,
    themes: &ThemeCatalog,
) -> CustomizationDocument {
    let theme = themes.default_theme();
    let mut document = CustomizationDocument::new(store_id, theme);
    theme_engine::select(&mut document, theme);
    for module_type in STARTER_MODULES {
        document.modules.add(registry.template_for(module_type));
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{PublishReceipt, PublishRequest, SlugCandidate};
    use crate::domain::module::ModuleSettings;
    use crate::domain::profile::StoreProfile;
    use crate::error::ComposerError;
    use crate::wire::PersistedDocument;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubGateway {
        stored: Mutex<Option<PersistedDocument>>,
    }

    #[async_trait]
    impl CustomizationGateway for StubGateway {
        async fn load(&self, _store_id: i64) -> Result<Option<PersistedDocument>> {
            Ok(self.stored.lock().unwrap().clone())
        }
        async fn save_draft(&self, _d: &PersistedDocument, _c: u64) -> Result<()> {
            Ok(())
        }
        async fn publish(&self, _r: &PublishRequest) -> Result<PublishReceipt> {
            unimplemented!("not used by load tests")
        }
        async fn generate_slug(&self, _s: i64, _n: &str) -> Result<SlugCandidate> {
            unimplemented!("not used by load tests")
        }
    }

    struct StubProfiles {
        fail: bool,
    }

    #[async_trait]
    impl StoreProfileGateway for StubProfiles {
        async fn comprehensive_details(&self, store_id: i64) -> Result<StoreProfile> {
            if self.fail {
                return Err(ComposerError::Api {
                    message: "profile service down".to_string(),
                });
            }
            Ok(StoreProfile {
                store_id,
                name: "Corner Ceramics".to_string(),
                contact_email: Some("hello@cornerceramics.example".to_string()),
                contact_phone: None,
                addresses: vec![],
                open_hours: vec![],
                payment_methods: vec![],
                categories: vec![],
            })
        }
    }

    #[tokio::test]
    async fn first_time_load_builds_starter_document() {
        let gateway = StubGateway {
            stored: Mutex::new(None),
        };
        let profiles = StubProfiles { fail: false };
        let session = LoadWorkflow::new(&gateway, &profiles)
            .load(
                5,
                Arc::new(ModuleRegistry::builtin()),
                Arc::new(ThemeCatalog::builtin()),
            )
            .await
            .unwrap();

        let types: Vec<_> = session
            .document()
            .modules
            .iter()
            .map(|m| m.module_type)
            .collect();
        assert_eq!(types, STARTER_MODULES.to_vec());
        assert!(session.document().custom_css.is_some());
        assert!(!session.is_dirty());

        // the contact form was enriched from the profile
        let contact = session
            .document()
            .modules
            .iter()
            .find(|m| m.module_type == ModuleType::ContactForm)
            .unwrap();
        match &contact.settings {
            ModuleSettings::ContactForm(s) => {
                assert_eq!(
                    s.enriched.as_ref().unwrap().email.as_deref(),
                    Some("hello@cornerceramics.example")
                );
            }
            other => panic!("unexpected settings variant: {:?}", other),
        }
    }

    #[tokio::test]
    async fn profile_failure_skips_enrichment_but_loads_fine() {
        let gateway = StubGateway {
            stored: Mutex::new(None),
        };
        let profiles = StubProfiles { fail: true };
        let session = LoadWorkflow::new(&gateway, &profiles)
            .load(
                5,
                Arc::new(ModuleRegistry::builtin()),
                Arc::new(ThemeCatalog::builtin()),
            )
            .await
            .unwrap();

        let contact = session
            .document()
            .modules
            .iter()
            .find(|m| m.module_type == ModuleType::ContactForm)
            .unwrap();
        match &contact.settings {
            ModuleSettings::ContactForm(s) => assert!(s.enriched.is_none()),
            other => panic!("unexpected settings variant: {:?}", other),
        }
    }

    #[tokio::test]
    async fn loaded_membership_is_conflict_normalized() {
        let registry = ModuleRegistry::builtin();
        let themes = ThemeCatalog::builtin();
        // persisted state written before the conflict rule existed: both a
        // contact form and a policy section showing contact info
        let mut doc = CustomizationDocument::new(5, themes.default_theme());
        doc.modules.add(registry.template_for(ModuleType::ContactForm));
        let policy = doc
            .modules
            .add(registry.template_for(ModuleType::PolicySection));
        let gateway = StubGateway {
            stored: Mutex::new(Some(PersistedDocument::from_document(&doc))),
        };
        let profiles = StubProfiles { fail: true };

        let session = LoadWorkflow::new(&gateway, &profiles)
            .load(5, Arc::new(registry), Arc::new(themes))
            .await
            .unwrap();
        match &session.document().modules.get(&policy).unwrap().settings {
            ModuleSettings::PolicySection(s) => assert!(!s.show_contact),
            other => panic!("unexpected settings variant: {:?}", other),
        }
    }
}
