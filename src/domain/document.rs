use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::module_list::ModuleList;
use crate::domain::theme::Theme;

/// Storefront-wide settings derived from the selected theme plus the
/// user-owned overrides (`footer_text`, `header_style`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub header_style: String,
    pub footer_text: String,
}

impl GlobalSettings {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            primary_color: theme.colors.primary.clone(),
            secondary_color: theme.colors.secondary.clone(),
            font_family: theme.typography.font_family.primary.clone(),
            header_style: "standard".to_string(),
            footer_text: String::new(),
        }
    }

    /// Re-derive the theme-owned fields while keeping the user overrides.
    pub fn rederive(&mut self, theme: &Theme) {
        self.primary_color = theme.colors.primary.clone();
        self.secondary_color = theme.colors.secondary.clone();
        self.font_family = theme.typography.font_family.primary.clone();
    }
}

/// The aggregate root: theme selection + module list + global settings +
/// publish state for one store. Exclusively owned by the editing session;
/// the persistence gateway holds the durable copy of record.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomizationDocument {
    pub store_id: i64,
    pub theme_id: String,
    pub modules: ModuleList,
    pub global_settings: GlobalSettings,
    /// Derived stylesheet, recomputed by the theme engine. Never hand-edited.
    pub custom_css: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Monotonic, bumped on every successful publish. Session-local; the
    /// persisted shape predates it.
    pub publish_version: u64,
    pub last_modified: DateTime<Utc>,
    /// Public identifier, resolved at publish time. Not part of the
    /// persisted document shape.
    pub slug: Option<String>,
}

impl CustomizationDocument {
    pub fn new(store_id: i64, theme: &Theme) -> Self {
        Self {
            store_id,
            theme_id: theme.id.clone(),
            modules: ModuleList::new(),
            global_settings: GlobalSettings::from_theme(theme),
            custom_css: None,
            is_published: false,
            published_at: None,
            publish_version: 0,
            last_modified: Utc::now(),
            slug: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}
