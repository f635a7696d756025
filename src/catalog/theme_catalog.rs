use once_cell::sync::Lazy;
use tracing::warn;

use crate::domain::theme::{Effects, FontFamily, Layout, TextColors, Theme, ThemeColors, Typography};

pub const DEFAULT_THEME_ID: &str = "modern-minimal";

/// Static catalog of selectable themes. Looking up an unknown id is a
/// caller bug: fatal in debug builds, logged fallback to the default theme
/// in release. The requested theme is never silently swapped for a
/// different one — callers that can tolerate absence use [`theme_for`].
///
/// [`theme_for`]: ThemeCatalog::theme_for
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn builtin() -> Self {
        Self {
            themes: BUILTIN_THEMES.clone(),
        }
    }

    pub fn theme_for(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Resolve an id that is expected to exist (e.g. a document's own
    /// `theme_id`). Unknown ids assert in debug and fall back to the
    /// default theme in release so rendering can proceed.
    pub fn resolve(&self, id: &str) -> &Theme {
        match self.theme_for(id) {
            Some(theme) => theme,
            None => {
                debug_assert!(false, "unknown theme id '{id}'");
                warn!(theme_id = %id, "unknown theme id, falling back to default");
                self.default_theme()
            }
        }
    }

    pub fn default_theme(&self) -> &Theme {
        // builtin() always seeds the default theme first
        &self.themes[0]
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }
}

fn theme(
    id: &str,
    name: &str,
    category: &str,
    primary: &str,
    secondary: &str,
    background: &str,
    surface: &str,
    accent: &str,
    text: (&str, &str, &str),
    border: &str,
    fonts: (&str, &str),
    border_radius: &str,
    box_shadow: &str,
    premium: bool,
) -> Theme {
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        colors: ThemeColors {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            background: background.to_string(),
            surface: surface.to_string(),
            accent: accent.to_string(),
            text: TextColors {
                primary: text.0.to_string(),
                secondary: text.1.to_string(),
                muted: text.2.to_string(),
            },
            border: border.to_string(),
        },
        typography: Typography {
            font_family: FontFamily {
                primary: fonts.0.to_string(),
                secondary: fonts.1.to_string(),
            },
            line_height: "1.6".to_string(),
        },
        layout: Layout {
            border_radius: border_radius.to_string(),
        },
        effects: Effects {
            box_shadow: box_shadow.to_string(),
            transition: "all 0.2s ease".to_string(),
        },
        premium,
    }
}

static BUILTIN_THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        theme(
            DEFAULT_THEME_ID,
            "Modern Minimal",
            "minimal",
            "#1a1a2e",
            "#4a4e69",
            "#ffffff",
            "#f7f7fb",
            "#e94560",
            ("#1a1a2e", "#4a4e69", "#9a8c98"),
            "#e0e0e6",
            ("'Inter', sans-serif", "'Inter', sans-serif"),
            "8px",
            "0 1px 3px rgba(0, 0, 0, 0.08)",
            false,
        ),
        theme(
            "warm-artisan",
            "Warm Artisan",
            "classic",
            "#6f4518",
            "#a47148",
            "#fdf6ec",
            "#f5e6d3",
            "#bc6c25",
            ("#3d2b1f", "#6f4518", "#a58d7f"),
            "#e6d5c0",
            ("'Lora', serif", "'Source Sans Pro', sans-serif"),
            "4px",
            "0 2px 4px rgba(61, 43, 31, 0.12)",
            false,
        ),
        theme(
            "bold-contrast",
            "Bold Contrast",
            "bold",
            "#000000",
            "#1f1f1f",
            "#ffffff",
            "#f0f0f0",
            "#ffd60a",
            ("#000000", "#333333", "#777777"),
            "#000000",
            ("'Archivo Black', sans-serif", "'Archivo', sans-serif"),
            "0px",
            "4px 4px 0 #000000",
            false,
        ),
        theme(
            "calm-pastel",
            "Calm Pastel",
            "soft",
            "#7d8fb3",
            "#a7b8d4",
            "#fbfcfe",
            "#eef2f9",
            "#f4acb7",
            ("#44506b", "#7d8fb3", "#aab4cc"),
            "#dde5f0",
            ("'Nunito', sans-serif", "'Nunito', sans-serif"),
            "12px",
            "0 4px 12px rgba(125, 143, 179, 0.15)",
            true,
        ),
        theme(
            "midnight-luxe",
            "Midnight Luxe",
            "dark",
            "#c9a227",
            "#8c6d1f",
            "#0d0d12",
            "#1a1a24",
            "#e0c35c",
            ("#f3f1e9", "#c9c5b8", "#8a8678"),
            "#2c2c3a",
            ("'Cormorant Garamond', serif", "'Montserrat', sans-serif"),
            "6px",
            "0 6px 18px rgba(0, 0, 0, 0.5)",
            true,
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_first_and_resolvable() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.default_theme().id, DEFAULT_THEME_ID);
        assert!(catalog.theme_for(DEFAULT_THEME_ID).is_some());
    }

    #[test]
    fn unknown_theme_is_none() {
        let catalog = ThemeCatalog::builtin();
        assert!(catalog.theme_for("no-such-theme").is_none());
    }

    #[test]
    fn theme_ids_are_unique() {
        let catalog = ThemeCatalog::builtin();
        let mut ids: Vec<_> = catalog.themes().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.themes().len());
    }
}
