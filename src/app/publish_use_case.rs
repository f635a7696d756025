use tracing::{info, instrument, warn};

use crate::app::ports::{CustomizationGateway, PublishReceipt, PublishRequest};
use crate::app::session::{EditorSession, EditorState};
use crate::error::{ComposerError, Result};
use crate::idempotency::compute_document_fingerprint;
use crate::observability;
use crate::wire::PersistedDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Content identical to the last successful save; no call was made.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub public_url: String,
    pub slug: String,
    pub publish_version: u64,
}

/// Orchestrates validate → save-draft → publish → slug/version assignment.
///
/// Failure semantics: validation fails before any network call; a save
/// failure aborts the publish; a publish-call failure leaves the prior
/// persisted draft intact and `is_published` unchanged. In every failure
/// case the in-memory draft survives with its edits.
pub struct PublishWorkflow<'a> {
    gateway: &'a dyn CustomizationGateway,
}

impl<'a> PublishWorkflow<'a> {
    pub fn new(gateway: &'a dyn CustomizationGateway) -> Self {
        Self { gateway }
    }

    /// Persist the current draft. Always captures the document as it is
    /// *now*; if the user keeps editing while the request is in flight the
    /// draft stays dirty and the next save picks the edits up.
    #[instrument(skip(self, session), fields(store_id = session.document().store_id))]
    pub async fn save_draft(&self, session: &mut EditorSession) -> Result<SaveOutcome> {
        let captured_counter = session.edit_counter();
        let persisted = PersistedDocument::from_document(session.document());
        let fingerprint = compute_document_fingerprint(&persisted);

        if session.last_saved_fingerprint() == Some(fingerprint.as_str()) {
            session.complete_save(captured_counter, fingerprint);
            observability::metrics::save_skipped_unchanged();
            return Ok(SaveOutcome::Unchanged);
        }

        session.set_state(EditorState::Saving);
        match self.gateway.save_draft(&persisted, captured_counter).await {
            Ok(()) => {
                session.complete_save(captured_counter, fingerprint);
                observability::metrics::save_success();
                info!("draft saved");
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                session.fail_to_draft();
                observability::metrics::save_error();
                warn!(error = %e, "draft save failed, edits preserved");
                Err(e)
            }
        }
    }

    /// Full publish pipeline. `seed_name` feeds slug generation when the
    /// document has no slug yet (typically the store name).
    #[instrument(skip(self, session), fields(store_id = session.document().store_id))]
    pub async fn publish(
        &self,
        session: &mut EditorSession,
        seed_name: &str,
    ) -> Result<PublishOutcome> {
        let store_id = session.document().store_id;
        let was_dirty = session.is_dirty();

        // Validation happens entirely in memory, before any network call.
        session.set_state(EditorState::Validating);
        if let Err(e) = validate(session) {
            session.abort_to_draft(was_dirty);
            observability::metrics::validation_failed();
            warn!(error = %e, "publish blocked by validation");
            return Err(e);
        }

        // Persist the latest draft first.
        session.set_state(EditorState::Saving);
        let captured_counter = session.edit_counter();
        let persisted = PersistedDocument::from_document(session.document());
        let fingerprint = compute_document_fingerprint(&persisted);
        if let Err(e) = self.gateway.save_draft(&persisted, captured_counter).await {
            session.fail_to_draft();
            observability::metrics::save_error();
            observability::metrics::publish_error();
            warn!(error = %e, "publish aborted: draft save failed");
            return Err(e);
        }

        // Resolve the public slug before the publish call.
        let slug = match session.document().slug.clone() {
            Some(slug) => slug,
            None => match self.gateway.generate_slug(store_id, seed_name).await {
                Ok(candidate) if candidate.available => candidate.slug,
                Ok(candidate) => {
                    session.fail_to_draft();
                    observability::metrics::publish_error();
                    return Err(ComposerError::SlugUnavailable(candidate.slug));
                }
                Err(e) => {
                    session.fail_to_draft();
                    observability::metrics::publish_error();
                    warn!(error = %e, "publish aborted: slug generation failed");
                    return Err(e);
                }
            },
        };

        session.set_state(EditorState::Publishing);
        let request = PublishRequest {
            store_id,
            customization: persisted,
            publish_now: true,
        };
        match self.gateway.publish(&request).await {
            Ok(PublishReceipt { public_url, slug }) => {
                session.complete_publish(captured_counter, fingerprint, slug.clone());
                observability::metrics::save_success();
                observability::metrics::publish_success();
                let publish_version = session.document().publish_version;
                info!(%slug, publish_version, "storefront published");
                Ok(PublishOutcome {
                    public_url,
                    slug,
                    publish_version,
                })
            }
            Err(e) => {
                // The draft we just saved is intact server-side; only the
                // publish step failed.
                session.fail_to_draft();
                observability::metrics::publish_error();
                warn!(error = %e, "publish call failed, prior draft intact");
                Err(e)
            }
        }
    }
}

/// Check each enabled module's required settings against its template.
/// Disabled modules are not rendered and do not block publish.
fn validate(session: &EditorSession) -> Result<()> {
    for module in session.document().modules.iter() {
        if !module.enabled {
            continue;
        }
        let template = session.registry().template_for(module.module_type);
        let settings = module.settings.to_value();
        for field in template.required_settings {
            let missing = match settings.get(*field) {
                None | Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(ComposerError::Validation {
                    module: module.module_type.to_string(),
                    field: (*field).to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::SlugCandidate;
    use crate::catalog::module_registry::ModuleRegistry;
    use crate::catalog::theme_catalog::ThemeCatalog;
    use crate::domain::document::CustomizationDocument;
    use crate::domain::module::ModuleType;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct GatewayCalls {
        saves: AtomicUsize,
        publishes: AtomicUsize,
        slugs: AtomicUsize,
    }

    struct MockGateway {
        calls: Arc<GatewayCalls>,
        saved: Mutex<Option<PersistedDocument>>,
        fail_save: bool,
        fail_publish: bool,
        slug_available: bool,
        auth_error: bool,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                calls: Arc::new(GatewayCalls::default()),
                saved: Mutex::new(None),
                fail_save: false,
                fail_publish: false,
                slug_available: true,
                auth_error: false,
            }
        }

        fn total_calls(&self) -> usize {
            self.calls.saves.load(Ordering::SeqCst)
                + self.calls.publishes.load(Ordering::SeqCst)
                + self.calls.slugs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CustomizationGateway for MockGateway {
        async fn load(&self, _store_id: i64) -> Result<Option<PersistedDocument>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save_draft(&self, document: &PersistedDocument, _edit_counter: u64) -> Result<()> {
            self.calls.saves.fetch_add(1, Ordering::SeqCst);
            if self.auth_error {
                return Err(ComposerError::Authorization { status: 401 });
            }
            if self.fail_save {
                return Err(ComposerError::Api {
                    message: "save exploded".to_string(),
                });
            }
            *self.saved.lock().unwrap() = Some(document.clone());
            Ok(())
        }

        async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
            self.calls.publishes.fetch_add(1, Ordering::SeqCst);
            if self.fail_publish {
                return Err(ComposerError::Api {
                    message: "publish exploded".to_string(),
                });
            }
            Ok(PublishReceipt {
                public_url: format!("https://shops.example/{}", request.store_id),
                slug: "corner-ceramics".to_string(),
            })
        }

        async fn generate_slug(&self, _store_id: i64, seed_name: &str) -> Result<SlugCandidate> {
            self.calls.slugs.fetch_add(1, Ordering::SeqCst);
            Ok(SlugCandidate {
                slug: seed_name.to_lowercase().replace(' ', "-"),
                available: self.slug_available,
            })
        }
    }

    fn session() -> EditorSession {
        let registry = Arc::new(ModuleRegistry::builtin());
        let themes = Arc::new(ThemeCatalog::builtin());
        let document = CustomizationDocument::new(7, themes.default_theme());
        EditorSession::new(document, registry, themes)
    }

    #[tokio::test]
    async fn publish_with_zero_modules_succeeds() {
        let gateway = MockGateway::new();
        let mut s = session();
        let outcome = PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .unwrap();

        assert!(s.document().is_published);
        assert!(s.document().published_at.is_some());
        assert_eq!(s.document().publish_version, 1);
        assert_eq!(outcome.slug, "corner-ceramics");
        assert!(!s.is_dirty());
    }

    #[tokio::test]
    async fn validation_failure_aborts_before_any_network_call() {
        let gateway = MockGateway::new();
        let mut s = session();
        let hero = s.add_module(ModuleType::HeroBanner);
        s.update_module_settings(&hero, &json!({"title": ""}));

        let err = PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::Validation { ref field, .. } if field == "title"));
        assert_eq!(gateway.total_calls(), 0);
        assert!(s.is_dirty());
        assert!(!s.document().is_published);
    }

    #[tokio::test]
    async fn disabled_module_does_not_block_publish() {
        let gateway = MockGateway::new();
        let mut s = session();
        let hero = s.add_module(ModuleType::HeroBanner);
        s.update_module_settings(&hero, &json!({"title": ""}));
        s.toggle_module(&hero);

        assert!(PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn save_failure_aborts_publish_and_preserves_draft() {
        let mut gateway = MockGateway::new();
        gateway.fail_save = true;
        let mut s = session();
        let about = s.add_module(ModuleType::AboutStore);
        s.update_module_settings(&about, &json!({"body": "We make pots."}));

        let err = PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::Api { .. }));
        assert_eq!(gateway.calls.publishes.load(Ordering::SeqCst), 0);
        assert!(s.is_dirty());
        assert!(!s.document().is_published);
        assert_eq!(s.state(), EditorState::Draft);
    }

    #[tokio::test]
    async fn publish_failure_leaves_is_published_unchanged() {
        let mut gateway = MockGateway::new();
        gateway.fail_publish = true;
        let mut s = session();

        let err = PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::Api { .. }));
        // the draft save went through before the publish failed
        assert_eq!(gateway.calls.saves.load(Ordering::SeqCst), 1);
        assert!(!s.document().is_published);
        assert_eq!(s.document().publish_version, 0);
        assert!(s.is_dirty());
    }

    #[tokio::test]
    async fn unavailable_slug_blocks_publish() {
        let mut gateway = MockGateway::new();
        gateway.slug_available = false;
        let mut s = session();

        let err = PublishWorkflow::new(&gateway)
            .publish(&mut s, "Corner Ceramics")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::SlugUnavailable(_)));
        assert_eq!(gateway.calls.publishes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorization_error_surfaces_distinctly_and_keeps_draft() {
        let mut gateway = MockGateway::new();
        gateway.auth_error = true;
        let mut s = session();
        s.add_module(ModuleType::AboutStore);
        let before = s.document().clone();

        let err = PublishWorkflow::new(&gateway)
            .save_draft(&mut s)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::Authorization { status: 401 }));
        // the in-memory draft is not corrupted by the failure
        assert_eq!(s.document().modules, before.modules);
        assert!(s.is_dirty());
    }

    #[tokio::test]
    async fn save_is_skipped_when_content_unchanged() {
        let gateway = MockGateway::new();
        let mut s = session();
        s.add_module(ModuleType::AboutStore);

        let workflow = PublishWorkflow::new(&gateway);
        assert_eq!(workflow.save_draft(&mut s).await.unwrap(), SaveOutcome::Saved);
        assert!(!s.is_dirty());

        // touching nothing and saving again does not hit the gateway
        assert_eq!(
            workflow.save_draft(&mut s).await.unwrap(),
            SaveOutcome::Unchanged
        );
        assert_eq!(gateway.calls.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_publish_bumps_the_version() {
        let gateway = MockGateway::new();
        let mut s = session();
        let workflow = PublishWorkflow::new(&gateway);
        workflow.publish(&mut s, "Corner Ceramics").await.unwrap();
        s.set_footer_text("Thanks for stopping by");
        workflow.publish(&mut s, "Corner Ceramics").await.unwrap();

        assert_eq!(s.document().publish_version, 2);
        // the slug from the first publish is reused, not regenerated
        assert_eq!(gateway.calls.slugs.load(Ordering::SeqCst), 1);
    }
}
