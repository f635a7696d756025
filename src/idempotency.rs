use sha2::{Digest, Sha256};

use crate::wire::PersistedDocument;

/// Fingerprint of a persisted document's content, ignoring `lastModified`.
/// Saving an identical document is idempotent server-side; the workflow
/// uses this to skip the call entirely when nothing changed.
pub fn compute_document_fingerprint(document: &PersistedDocument) -> String {
    let mut value = serde_json::to_value(document).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        map.remove("lastModified");
    }
    let canonical = value.to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::module_registry::ModuleRegistry;
    use crate::catalog::theme_catalog::ThemeCatalog;
    use crate::domain::document::CustomizationDocument;
    use crate::domain::module::ModuleType;

    #[test]
    fn fingerprint_ignores_last_modified() {
        let catalog = ThemeCatalog::builtin();
        let mut doc = CustomizationDocument::new(1, catalog.default_theme());
        let a = compute_document_fingerprint(&PersistedDocument::from_document(&doc));
        doc.touch();
        let b = compute_document_fingerprint(&PersistedDocument::from_document(&doc));
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let catalog = ThemeCatalog::builtin();
        let registry = ModuleRegistry::builtin();
        let mut doc = CustomizationDocument::new(1, catalog.default_theme());
        let a = compute_document_fingerprint(&PersistedDocument::from_document(&doc));
        doc.modules.add(registry.template_for(ModuleType::HeroBanner));
        let b = compute_document_fingerprint(&PersistedDocument::from_document(&doc));
        assert_ne!(a, b);
    }
}
