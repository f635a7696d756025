use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::catalog::module_registry::ModuleRegistry;
use crate::domain::document::{CustomizationDocument, GlobalSettings};
use crate::domain::module::{ModuleConfig, ModuleSettings, ModuleType};
use crate::domain::module_list::ModuleList;

/// Persisted module shape. Compatibility-sensitive: the wire field is
/// `isVisible` (in-memory `enabled`) and the body text is `content`
/// (in-memory `description`). `icon` is registry-owned and re-derived on
/// load rather than persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedModule {
    pub id: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub title: String,
    pub content: String,
    pub settings: Value,
    pub order: u32,
    pub is_visible: bool,
}

/// Persisted document shape, bit-exact per the backend contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    pub store_id: i64,
    pub theme_id: String,
    pub modules: Vec<PersistedModule>,
    pub global_settings: GlobalSettings,
    #[serde(default)]
    pub custom_css: Option<String>,
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    pub last_modified: String,
}

fn to_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl PersistedDocument {
    pub fn from_document(document: &CustomizationDocument) -> Self {
        Self {
            store_id: document.store_id,
            theme_id: document.theme_id.clone(),
            modules: document
                .modules
                .iter()
                .map(|m| PersistedModule {
                    id: m.id.clone(),
                    module_type: m.module_type.as_str().to_string(),
                    title: m.title.clone(),
                    content: m.description.clone(),
                    settings: m.settings.to_value(),
                    order: m.order,
                    is_visible: m.enabled,
                })
                .collect(),
            global_settings: document.global_settings.clone(),
            custom_css: document.custom_css.clone(),
            is_published: document.is_published,
            published_at: document.published_at.as_ref().map(to_iso),
            last_modified: to_iso(&document.last_modified),
        }
    }

    /// Rebuild the in-memory document. Modules with an unrecognized type are
    /// skipped with a warning — a different template is never substituted.
    /// Settings that no longer parse fall back to the template defaults.
    pub fn into_document(self, registry: &ModuleRegistry) -> CustomizationDocument {
        let mut modules = Vec::with_capacity(self.modules.len());
        for persisted in self.modules {
            let Some(module_type) = ModuleType::parse(&persisted.module_type) else {
                warn!(
                    module_id = %persisted.id,
                    module_type = %persisted.module_type,
                    "skipping module with unknown type"
                );
                continue;
            };
            let template = registry.template_for(module_type);
            let settings = match ModuleSettings::from_value(module_type, &persisted.settings) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(
                        module_id = %persisted.id,
                        error = %e,
                        "settings failed to parse, using template defaults"
                    );
                    template.default_settings()
                }
            };
            modules.push(ModuleConfig {
                id: persisted.id,
                module_type,
                title: persisted.title,
                description: persisted.content,
                icon: template.icon.to_string(),
                enabled: persisted.is_visible,
                order: persisted.order,
                settings,
            });
        }

        let published_at = self.published_at.as_deref().and_then(parse_iso);
        let last_modified = parse_iso(&self.last_modified).unwrap_or_else(Utc::now);
        CustomizationDocument {
            store_id: self.store_id,
            theme_id: self.theme_id,
            modules: ModuleList::from_modules(modules),
            global_settings: self.global_settings,
            custom_css: self.custom_css,
            is_published: self.is_published,
            published_at,
            // The persisted shape predates the version counter; seed it from
            // the publish flag so it stays monotonic within this session.
            publish_version: u64::from(self.is_published),
            last_modified,
            slug: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::theme_catalog::ThemeCatalog;
    use serde_json::json;

    fn sample_document() -> CustomizationDocument {
        let registry = ModuleRegistry::builtin();
        let catalog = ThemeCatalog::builtin();
        let mut doc = CustomizationDocument::new(42, catalog.default_theme());
        crate::composer::theme_engine::select(&mut doc, catalog.resolve("warm-artisan"));
        let hero = doc.modules.add(registry.template_for(ModuleType::HeroBanner));
        doc.modules.add(registry.template_for(ModuleType::ContactForm));
        doc.modules
            .update_settings(&hero, &json!({"title": "Hand-thrown pottery"}));
        doc.modules.toggle(&hero);
        doc
    }

    #[test]
    fn wire_field_names_are_bit_exact() {
        let persisted = PersistedDocument::from_document(&sample_document());
        let value = serde_json::to_value(&persisted).unwrap();
        assert!(value.get("storeId").is_some());
        assert!(value.get("themeId").is_some());
        assert!(value.get("globalSettings").is_some());
        assert!(value.get("isPublished").is_some());
        assert!(value.get("lastModified").is_some());
        let module = &value["modules"][0];
        assert!(module.get("isVisible").is_some());
        assert!(module.get("content").is_some());
        assert_eq!(module["type"], "hero-banner");
        // in-memory names must not leak
        assert!(module.get("enabled").is_none());
        assert!(module.get("moduleType").is_none());
    }

    #[test]
    fn round_trip_preserves_document_up_to_timestamps() {
        let registry = ModuleRegistry::builtin();
        let doc = sample_document();
        let restored =
            PersistedDocument::from_document(&doc).into_document(&registry);

        assert_eq!(restored.store_id, doc.store_id);
        assert_eq!(restored.theme_id, doc.theme_id);
        assert_eq!(restored.global_settings, doc.global_settings);
        assert_eq!(restored.custom_css, doc.custom_css);
        assert_eq!(restored.is_published, doc.is_published);
        let original: Vec<_> = doc.modules.iter().cloned().collect();
        let roundtripped: Vec<_> = restored.modules.iter().cloned().collect();
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn is_visible_maps_to_enabled() {
        let registry = ModuleRegistry::builtin();
        let doc = sample_document();
        let persisted = PersistedDocument::from_document(&doc);
        assert!(!persisted.modules[0].is_visible);
        assert!(persisted.modules[1].is_visible);

        let restored = persisted.into_document(&registry);
        let modules: Vec<_> = restored.modules.iter().collect();
        assert!(!modules[0].enabled);
        assert!(modules[1].enabled);
    }

    #[test]
    fn unknown_module_type_is_skipped_not_substituted() {
        let registry = ModuleRegistry::builtin();
        let mut persisted = PersistedDocument::from_document(&sample_document());
        persisted.modules[0].module_type = "wishlist-widget".to_string();
        let restored = persisted.into_document(&registry);
        assert_eq!(restored.modules.len(), 1);
        assert_eq!(
            restored.modules.iter().next().unwrap().module_type,
            ModuleType::ContactForm
        );
        // orders re-densified after the skip
        assert_eq!(restored.modules.iter().next().unwrap().order, 0);
    }

    #[test]
    fn unparseable_settings_fall_back_to_template_defaults() {
        let registry = ModuleRegistry::builtin();
        let mut persisted = PersistedDocument::from_document(&sample_document());
        persisted.modules[0].settings = json!("not an object");
        let restored = persisted.into_document(&registry);
        let hero = restored.modules.iter().next().unwrap();
        assert_eq!(hero.settings, registry.template_for(ModuleType::HeroBanner).default_settings());
    }
}
