use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::theme_catalog::ThemeCatalog;
use crate::domain::document::CustomizationDocument;
use crate::domain::module::ModuleType;
use crate::domain::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    Desktop,
    Tablet,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewMode {
    pub device: DeviceMode,
    pub is_live_preview: bool,
}

/// Theme tokens resolved for one rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTokens {
    pub background: String,
    pub text_color: String,
    pub accent: String,
    pub font_family: String,
    pub border_radius: String,
}

/// Presentation descriptor for one enabled module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPlan {
    pub module_id: String,
    pub module_type: ModuleType,
    pub title: String,
    pub settings: Value,
    pub tokens: SectionTokens,
    /// Featured products render from the live inventory feed; the product
    /// data is not part of the document.
    pub uses_live_inventory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub device: DeviceMode,
    pub idle: bool,
    pub theme_id: String,
    pub custom_css: Option<String>,
    pub sections: Vec<SectionPlan>,
}

impl RenderPlan {
    fn idle(device: DeviceMode, theme_id: &str) -> Self {
        Self {
            device,
            idle: true,
            theme_id: theme_id.to_string(),
            custom_css: None,
            sections: Vec::new(),
        }
    }
}

/// Pure function from document + preview mode to a render plan. Filters to
/// enabled modules, sorts by order, and pairs each with its resolved theme
/// tokens. Never mutates the document; with live preview off it yields an
/// idle plan instead of recomputing.
pub fn render(
    document: &CustomizationDocument,
    themes: &ThemeCatalog,
    mode: &PreviewMode,
) -> RenderPlan {
    if !mode.is_live_preview {
        return RenderPlan::idle(mode.device, &document.theme_id);
    }

    let theme = themes.resolve(&document.theme_id);
    let mut modules: Vec<_> = document.modules.iter().filter(|m| m.enabled).collect();
    modules.sort_by_key(|m| m.order);

    let sections = modules
        .into_iter()
        .enumerate()
        .map(|(position, module)| SectionPlan {
            module_id: module.id.clone(),
            module_type: module.module_type,
            title: module.title.clone(),
            settings: module.settings.to_value(),
            tokens: tokens_for(theme, position),
            uses_live_inventory: module.module_type == ModuleType::FeaturedProducts,
        })
        .collect();

    RenderPlan {
        device: mode.device,
        idle: false,
        theme_id: document.theme_id.clone(),
        custom_css: document.custom_css.clone(),
        sections,
    }
}

fn tokens_for(theme: &Theme, position: usize) -> SectionTokens {
    // Alternate background and surface so adjacent sections read distinctly.
    let background = if position % 2 == 0 {
        theme.colors.background.clone()
    } else {
        theme.colors.surface.clone()
    };
    SectionTokens {
        background,
        text_color: theme.colors.text.primary.clone(),
        accent: theme.colors.accent.clone(),
        font_family: theme.typography.font_family.primary.clone(),
        border_radius: theme.layout.border_radius.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::module_registry::ModuleRegistry;
    use crate::domain::module_list::MoveDirection;

    fn doc_with_three_modules() -> (CustomizationDocument, Vec<String>) {
        let registry = ModuleRegistry::builtin();
        let catalog = ThemeCatalog::builtin();
        let mut doc = CustomizationDocument::new(1, catalog.default_theme());
        let ids = vec![
            doc.modules.add(registry.template_for(ModuleType::HeroBanner)),
            doc.modules
                .add(registry.template_for(ModuleType::FeaturedProducts)),
            doc.modules.add(registry.template_for(ModuleType::ContactForm)),
        ];
        (doc, ids)
    }

    const LIVE: PreviewMode = PreviewMode {
        device: DeviceMode::Desktop,
        is_live_preview: true,
    };

    #[test]
    fn renders_enabled_modules_in_order() {
        let (mut doc, ids) = doc_with_three_modules();
        doc.modules.move_module(&ids[2], MoveDirection::Up);
        let plan = render(&doc, &ThemeCatalog::builtin(), &LIVE);
        let rendered: Vec<_> = plan.sections.iter().map(|s| s.module_id.as_str()).collect();
        assert_eq!(rendered, vec![ids[0].as_str(), ids[2].as_str(), ids[1].as_str()]);
    }

    #[test]
    fn disabled_module_is_filtered_without_affecting_others() {
        let (mut doc, ids) = doc_with_three_modules();
        doc.modules.toggle(&ids[1]);
        let plan = render(&doc, &ThemeCatalog::builtin(), &LIVE);
        let rendered: Vec<_> = plan.sections.iter().map(|s| s.module_id.as_str()).collect();
        assert_eq!(rendered, vec![ids[0].as_str(), ids[2].as_str()]);
        // orders in the document itself are untouched
        assert_eq!(doc.modules.get(&ids[2]).unwrap().order, 2);
    }

    #[test]
    fn live_preview_off_yields_idle_plan() {
        let (doc, _) = doc_with_three_modules();
        let mode = PreviewMode {
            device: DeviceMode::Mobile,
            is_live_preview: false,
        };
        let plan = render(&doc, &ThemeCatalog::builtin(), &mode);
        assert!(plan.idle);
        assert!(plan.sections.is_empty());
    }

    #[test]
    fn featured_products_marks_live_inventory() {
        let (doc, ids) = doc_with_three_modules();
        let plan = render(&doc, &ThemeCatalog::builtin(), &LIVE);
        let featured = plan
            .sections
            .iter()
            .find(|s| s.module_id == ids[1])
            .unwrap();
        assert!(featured.uses_live_inventory);
        assert!(!plan.sections[0].uses_live_inventory);
    }

    #[test]
    fn render_does_not_mutate_the_document() {
        let (doc, _) = doc_with_three_modules();
        let before = doc.clone();
        let _ = render(&doc, &ThemeCatalog::builtin(), &LIVE);
        assert_eq!(doc, before);
    }
}
