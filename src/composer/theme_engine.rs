use std::fmt::Write;

use crate::domain::document::CustomizationDocument;
use crate::domain::theme::Theme;

/// Swap the document's theme. Recomputes the derived stylesheet and
/// re-derives the theme-owned global settings; module settings are never
/// touched by a theme change — rendering tokens are resolved at render
/// time, not baked into modules.
pub fn select(document: &mut CustomizationDocument, theme: &Theme) {
    document.theme_id = theme.id.clone();
    document.custom_css = Some(render_css(theme));
    document.global_settings.rederive(theme);
}

/// Deterministic stylesheet for a theme: a pure function of the token set,
/// so the same theme always yields byte-identical CSS.
pub fn render_css(theme: &Theme) -> String {
    let mut css = String::with_capacity(1024);
    let c = &theme.colors;
    let _ = writeln!(css, "/* theme: {} */", theme.id);
    let _ = writeln!(css, ":root {{");
    let _ = writeln!(css, "  --sf-color-primary: {};", c.primary);
    let _ = writeln!(css, "  --sf-color-secondary: {};", c.secondary);
    let _ = writeln!(css, "  --sf-color-background: {};", c.background);
    let _ = writeln!(css, "  --sf-color-surface: {};", c.surface);
    let _ = writeln!(css, "  --sf-color-accent: {};", c.accent);
    let _ = writeln!(css, "  --sf-color-text: {};", c.text.primary);
    let _ = writeln!(css, "  --sf-color-text-secondary: {};", c.text.secondary);
    let _ = writeln!(css, "  --sf-color-text-muted: {};", c.text.muted);
    let _ = writeln!(css, "  --sf-color-border: {};", c.border);
    let _ = writeln!(css, "  --sf-font-primary: {};", theme.typography.font_family.primary);
    let _ = writeln!(css, "  --sf-font-secondary: {};", theme.typography.font_family.secondary);
    let _ = writeln!(css, "  --sf-line-height: {};", theme.typography.line_height);
    let _ = writeln!(css, "  --sf-border-radius: {};", theme.layout.border_radius);
    let _ = writeln!(css, "  --sf-box-shadow: {};", theme.effects.box_shadow);
    let _ = writeln!(css, "  --sf-transition: {};", theme.effects.transition);
    let _ = writeln!(css, "}}");
    let _ = writeln!(
        css,
        "body {{ background: var(--sf-color-background); color: var(--sf-color-text); font-family: var(--sf-font-primary); line-height: var(--sf-line-height); }}"
    );
    let _ = writeln!(
        css,
        ".sf-section {{ background: var(--sf-color-surface); border-radius: var(--sf-border-radius); box-shadow: var(--sf-box-shadow); transition: var(--sf-transition); }}"
    );
    let _ = writeln!(
        css,
        ".sf-button {{ background: var(--sf-color-accent); border-radius: var(--sf-border-radius); }}"
    );
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::theme_catalog::ThemeCatalog;
    use crate::domain::module::ModuleType;

    #[test]
    fn render_css_is_deterministic() {
        let catalog = ThemeCatalog::builtin();
        let theme = catalog.resolve("warm-artisan");
        assert_eq!(render_css(theme), render_css(theme));
    }

    #[test]
    fn css_is_independent_of_document_history() {
        let catalog = ThemeCatalog::builtin();
        let registry = crate::catalog::module_registry::ModuleRegistry::builtin();

        let mut fresh = CustomizationDocument::new(1, catalog.default_theme());
        let mut edited = CustomizationDocument::new(1, catalog.default_theme());
        edited
            .modules
            .add(registry.template_for(ModuleType::HeroBanner));
        select(&mut edited, catalog.resolve("bold-contrast"));
        select(&mut edited, catalog.resolve("warm-artisan"));
        select(&mut fresh, catalog.resolve("warm-artisan"));

        assert_eq!(fresh.custom_css, edited.custom_css);
        assert!(fresh.custom_css.as_deref().unwrap().contains("#6f4518"));
    }

    #[test]
    fn select_rederives_globals_but_keeps_footer_text() {
        let catalog = ThemeCatalog::builtin();
        let mut doc = CustomizationDocument::new(1, catalog.default_theme());
        doc.global_settings.footer_text = "Thanks for visiting".to_string();

        select(&mut doc, catalog.resolve("bold-contrast"));
        assert_eq!(doc.theme_id, "bold-contrast");
        assert_eq!(doc.global_settings.primary_color, "#000000");
        assert_eq!(doc.global_settings.footer_text, "Thanks for visiting");
    }

    #[test]
    fn select_does_not_touch_module_settings() {
        let catalog = ThemeCatalog::builtin();
        let registry = crate::catalog::module_registry::ModuleRegistry::builtin();
        let mut doc = CustomizationDocument::new(1, catalog.default_theme());
        doc.modules.add(registry.template_for(ModuleType::HeroBanner));
        let before: Vec<_> = doc.modules.iter().cloned().collect();

        select(&mut doc, catalog.resolve("midnight-luxe"));
        let after: Vec<_> = doc.modules.iter().cloned().collect();
        assert_eq!(before, after);
    }
}
