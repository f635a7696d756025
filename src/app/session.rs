use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::module_registry::ModuleRegistry;
use crate::catalog::theme_catalog::ThemeCatalog;
use crate::composer::conflict::ConflictResolver;
use crate::composer::enrich::DataEnricher;
use crate::composer::theme_engine;
use crate::domain::document::CustomizationDocument;
use crate::domain::module::ModuleType;
use crate::domain::module_list::MoveDirection;
use crate::domain::profile::StoreProfile;
use crate::observability;

/// Workflow phase of the editing session. The dirty flag is tracked next to
/// it so an in-flight save does not lose track of edits made while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Draft,
    Saving,
    Validating,
    Publishing,
}

/// Whether the user may leave the editor without being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationGuard {
    Allowed,
    NeedsConfirmation,
}

/// Exclusive owner of the in-memory [`CustomizationDocument`]. Every user
/// mutation goes through here: it bumps the edit counter, marks the draft
/// dirty, and re-runs conflict resolution after membership changes.
///
/// The session is single-threaded and event-driven; the async suspension
/// points live in the workflows, which hand results back to these methods.
pub struct EditorSession {
    document: CustomizationDocument,
    state: EditorState,
    dirty: bool,
    edit_counter: u64,
    load_generation: u64,
    enriched_generation: Option<u64>,
    last_saved_fingerprint: Option<String>,
    registry: Arc<ModuleRegistry>,
    themes: Arc<ThemeCatalog>,
    resolver: ConflictResolver,
    enricher: DataEnricher,
}

impl EditorSession {
    pub fn new(
        document: CustomizationDocument,
        registry: Arc<ModuleRegistry>,
        themes: Arc<ThemeCatalog>,
    ) -> Self {
        Self {
            document,
            state: EditorState::Draft,
            dirty: false,
            edit_counter: 0,
            load_generation: 1,
            enriched_generation: None,
            last_saved_fingerprint: None,
            registry,
            themes,
            resolver: ConflictResolver::with_builtin_rules(),
            enricher: DataEnricher::new(),
        }
    }

    pub fn document(&self) -> &CustomizationDocument {
        &self.document
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn edit_counter(&self) -> u64 {
        self.edit_counter
    }

    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn themes(&self) -> &ThemeCatalog {
        &self.themes
    }

    // ---- user mutations -------------------------------------------------

    pub fn add_module(&mut self, module_type: ModuleType) -> String {
        let template = self.registry.template_for(module_type);
        let id = self.document.modules.add(template);
        self.resolver.resolve(&mut self.document.modules);
        self.mark_edited();
        id
    }

    pub fn remove_module(&mut self, id: &str) -> bool {
        let removed = self.document.modules.remove(id);
        if removed {
            self.resolver.resolve(&mut self.document.modules);
            self.mark_edited();
        }
        removed
    }

    /// Reordering never changes membership, so no conflict pass.
    pub fn move_module(&mut self, id: &str, direction: MoveDirection) -> bool {
        let moved = self.document.modules.move_module(id, direction);
        if moved {
            self.mark_edited();
        }
        moved
    }

    pub fn toggle_module(&mut self, id: &str) -> bool {
        let toggled = self.document.modules.toggle(id);
        if toggled {
            self.mark_edited();
        }
        toggled
    }

    pub fn update_module_settings(&mut self, id: &str, patch: &Value) -> bool {
        let updated = self.document.modules.update_settings(id, patch);
        if updated {
            self.mark_edited();
        }
        updated
    }

    /// Swap the theme. Unknown ids are a caller error and leave the
    /// document untouched — the requested theme is never substituted.
    pub fn select_theme(&mut self, theme_id: &str) -> bool {
        match self.themes.theme_for(theme_id) {
            Some(theme) => {
                let theme = theme.clone();
                theme_engine::select(&mut self.document, &theme);
                self.mark_edited();
                true
            }
            None => {
                warn!(theme_id = %theme_id, "select_theme: unknown theme id");
                false
            }
        }
    }

    pub fn set_footer_text(&mut self, footer_text: &str) {
        self.document.global_settings.footer_text = footer_text.to_string();
        self.mark_edited();
    }

    fn mark_edited(&mut self) {
        self.edit_counter += 1;
        self.dirty = true;
        self.document.touch();
    }

    // ---- enrichment (once per load, stale completions discarded) --------

    /// Apply the store profile projection if `generation` still belongs to
    /// the current load. A completion from a superseded load, or a second
    /// completion for the same load, is discarded so it can never clobber
    /// edits made in the meantime. Enrichment is upstream truth, not a user
    /// edit: it neither dirties the draft nor bumps the edit counter.
    pub fn apply_enrichment(&mut self, profile: &StoreProfile, generation: u64) -> bool {
        if generation != self.load_generation {
            warn!(
                stale = generation,
                current = self.load_generation,
                "discarding stale enrichment completion"
            );
            observability::metrics::enrichment_discarded_stale();
            return false;
        }
        if self.enriched_generation == Some(generation) {
            debug!(generation, "enrichment already applied for this load");
            observability::metrics::enrichment_discarded_stale();
            return false;
        }
        self.enricher.enrich(&mut self.document.modules, profile);
        self.enriched_generation = Some(generation);
        true
    }

    /// Start a new load generation (e.g. the session re-loads the
    /// document). Enrichment responses tagged with the old generation are
    /// discarded from here on.
    pub fn next_load_generation(&mut self) -> u64 {
        self.load_generation += 1;
        self.enriched_generation = None;
        self.load_generation
    }

    /// Re-normalize membership constraints, used after load.
    pub fn resolve_conflicts(&mut self) -> usize {
        self.resolver.resolve(&mut self.document.modules)
    }

    // ---- navigation guard ----------------------------------------------

    /// Leaving with unsaved edits requires explicit confirmation. A scoped
    /// guard, not a lock: nothing prevents other flows from proceeding.
    pub fn navigation_guard(&self) -> NavigationGuard {
        if self.dirty {
            NavigationGuard::NeedsConfirmation
        } else {
            NavigationGuard::Allowed
        }
    }

    /// The user explicitly confirmed discarding the in-memory draft.
    pub fn confirm_discard(&mut self) {
        self.dirty = false;
    }

    // ---- workflow plumbing (crate-internal) -----------------------------

    pub(crate) fn set_state(&mut self, state: EditorState) {
        self.state = state;
    }

    pub(crate) fn last_saved_fingerprint(&self) -> Option<&str> {
        self.last_saved_fingerprint.as_deref()
    }

    /// A save captured at `captured_counter` completed. The draft is only
    /// clean if no edits arrived while the request was in flight.
    pub(crate) fn complete_save(&mut self, captured_counter: u64, fingerprint: String) {
        self.last_saved_fingerprint = Some(fingerprint);
        self.dirty = self.edit_counter != captured_counter;
        self.state = EditorState::Draft;
    }

    /// A save or publish failed: back to draft, edits preserved.
    pub(crate) fn fail_to_draft(&mut self) {
        self.dirty = true;
        self.state = EditorState::Draft;
    }

    /// Validation failed before any network call; the dirty flag is
    /// whatever it was before the attempt.
    pub(crate) fn abort_to_draft(&mut self, was_dirty: bool) {
        self.dirty = was_dirty;
        self.state = EditorState::Draft;
    }

    pub(crate) fn complete_publish(
        &mut self,
        captured_counter: u64,
        fingerprint: String,
        slug: String,
    ) {
        self.document.is_published = true;
        self.document.published_at = Some(chrono::Utc::now());
        self.document.publish_version += 1;
        self.document.slug = Some(slug);
        self.complete_save(captured_counter, fingerprint);
    }
}
