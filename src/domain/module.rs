use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::profile::DayHours;

/// Closed enumeration of storefront section types. The wire discriminant is
/// the kebab-case string (`hero-banner`, `contact-form`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
    HeroBanner,
    FeaturedProducts,
    ContactForm,
    PolicySection,
    BusinessHours,
    PaymentMethods,
    CategoryShowcase,
    AboutStore,
}

impl ModuleType {
    pub const ALL: [ModuleType; 8] = [
        ModuleType::HeroBanner,
        ModuleType::FeaturedProducts,
        ModuleType::ContactForm,
        ModuleType::PolicySection,
        ModuleType::BusinessHours,
        ModuleType::PaymentMethods,
        ModuleType::CategoryShowcase,
        ModuleType::AboutStore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::HeroBanner => "hero-banner",
            ModuleType::FeaturedProducts => "featured-products",
            ModuleType::ContactForm => "contact-form",
            ModuleType::PolicySection => "policy-section",
            ModuleType::BusinessHours => "business-hours",
            ModuleType::PaymentMethods => "payment-methods",
            ModuleType::CategoryShowcase => "category-showcase",
            ModuleType::AboutStore => "about-store",
        }
    }

    pub fn parse(s: &str) -> Option<ModuleType> {
        ModuleType::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for ModuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only projection of upstream contact data, kept under the reserved
/// `enriched` settings key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHours {
    pub hours: Vec<DayHours>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPayments {
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCategories {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroBannerSettings {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_url: String,
    pub background_image: Option<String>,
    pub show_store_name: bool,
}

impl Default for HeroBannerSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            cta_text: "Shop now".to_string(),
            cta_url: String::new(),
            background_image: None,
            show_store_name: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturedProductsSettings {
    pub heading: String,
    pub max_items: u32,
    pub show_prices: bool,
    pub layout: String,
}

impl Default for FeaturedProductsSettings {
    fn default() -> Self {
        Self {
            heading: "Featured products".to_string(),
            max_items: 8,
            show_prices: true,
            layout: "grid".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFormSettings {
    pub heading: String,
    pub show_contact_info: bool,
    pub success_message: String,
    pub enriched: Option<EnrichedContact>,
}

impl Default for ContactFormSettings {
    fn default() -> Self {
        Self {
            heading: "Get in touch".to_string(),
            show_contact_info: true,
            success_message: "Thanks! We'll get back to you soon.".to_string(),
            enriched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySectionSettings {
    pub heading: String,
    pub body: String,
    pub show_contact: bool,
    /// Set when the conflict resolver forced `show_contact` off; restoration
    /// only applies to flags we suppressed, never to user choices.
    pub contact_suppressed: bool,
    pub enriched: Option<EnrichedContact>,
}

impl Default for PolicySectionSettings {
    fn default() -> Self {
        Self {
            heading: "Store policies".to_string(),
            body: String::new(),
            show_contact: true,
            contact_suppressed: false,
            enriched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessHoursSettings {
    pub heading: String,
    pub highlight_today: bool,
    pub enriched: Option<EnrichedHours>,
}

impl Default for BusinessHoursSettings {
    fn default() -> Self {
        Self {
            heading: "Opening hours".to_string(),
            highlight_today: true,
            enriched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethodsSettings {
    pub heading: String,
    pub show_icons: bool,
    pub enriched: Option<EnrichedPayments>,
}

impl Default for PaymentMethodsSettings {
    fn default() -> Self {
        Self {
            heading: "Ways to pay".to_string(),
            show_icons: true,
            enriched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryShowcaseSettings {
    pub heading: String,
    pub columns: u32,
    pub enriched: Option<EnrichedCategories>,
}

impl Default for CategoryShowcaseSettings {
    fn default() -> Self {
        Self {
            heading: "Shop by category".to_string(),
            columns: 3,
            enriched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutStoreSettings {
    pub heading: String,
    pub body: String,
}

impl Default for AboutStoreSettings {
    fn default() -> Self {
        Self {
            heading: "About us".to_string(),
            body: String::new(),
        }
    }
}

/// Per-type settings bag. The discriminant lives on [`ModuleConfig`]; on the
/// wire only the inner object is stored, so (de)serialization goes through
/// [`ModuleSettings::to_value`] / [`ModuleSettings::from_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleSettings {
    HeroBanner(HeroBannerSettings),
    FeaturedProducts(FeaturedProductsSettings),
    ContactForm(ContactFormSettings),
    PolicySection(PolicySectionSettings),
    BusinessHours(BusinessHoursSettings),
    PaymentMethods(PaymentMethodsSettings),
    CategoryShowcase(CategoryShowcaseSettings),
    AboutStore(AboutStoreSettings),
}

impl ModuleSettings {
    pub fn default_for(module_type: ModuleType) -> ModuleSettings {
        match module_type {
            ModuleType::HeroBanner => ModuleSettings::HeroBanner(Default::default()),
            ModuleType::FeaturedProducts => ModuleSettings::FeaturedProducts(Default::default()),
            ModuleType::ContactForm => ModuleSettings::ContactForm(Default::default()),
            ModuleType::PolicySection => ModuleSettings::PolicySection(Default::default()),
            ModuleType::BusinessHours => ModuleSettings::BusinessHours(Default::default()),
            ModuleType::PaymentMethods => ModuleSettings::PaymentMethods(Default::default()),
            ModuleType::CategoryShowcase => ModuleSettings::CategoryShowcase(Default::default()),
            ModuleType::AboutStore => ModuleSettings::AboutStore(Default::default()),
        }
    }

    pub fn module_type(&self) -> ModuleType {
        match self {
            ModuleSettings::HeroBanner(_) => ModuleType::HeroBanner,
            ModuleSettings::FeaturedProducts(_) => ModuleType::FeaturedProducts,
            ModuleSettings::ContactForm(_) => ModuleType::ContactForm,
            ModuleSettings::PolicySection(_) => ModuleType::PolicySection,
            ModuleSettings::BusinessHours(_) => ModuleType::BusinessHours,
            ModuleSettings::PaymentMethods(_) => ModuleType::PaymentMethods,
            ModuleSettings::CategoryShowcase(_) => ModuleType::CategoryShowcase,
            ModuleSettings::AboutStore(_) => ModuleType::AboutStore,
        }
    }

    /// Serialize the inner settings object. Plain structs of strings, bools
    /// and numbers cannot fail to serialize; fall back to an empty object so
    /// callers never see a panic.
    pub fn to_value(&self) -> Value {
        let result = match self {
            ModuleSettings::HeroBanner(s) => serde_json::to_value(s),
            ModuleSettings::FeaturedProducts(s) => serde_json::to_value(s),
            ModuleSettings::ContactForm(s) => serde_json::to_value(s),
            ModuleSettings::PolicySection(s) => serde_json::to_value(s),
            ModuleSettings::BusinessHours(s) => serde_json::to_value(s),
            ModuleSettings::PaymentMethods(s) => serde_json::to_value(s),
            ModuleSettings::CategoryShowcase(s) => serde_json::to_value(s),
            ModuleSettings::AboutStore(s) => serde_json::to_value(s),
        };
        result.unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }

    /// Parse a settings object for the given type. All fields are defaulted,
    /// so a partial or legacy object still parses; a structurally wrong value
    /// (non-object, mistyped field) is an error the caller decides on.
    pub fn from_value(module_type: ModuleType, value: &Value) -> serde_json::Result<ModuleSettings> {
        let settings = match module_type {
            ModuleType::HeroBanner => {
                ModuleSettings::HeroBanner(serde_json::from_value(value.clone())?)
            }
            ModuleType::FeaturedProducts => {
                ModuleSettings::FeaturedProducts(serde_json::from_value(value.clone())?)
            }
            ModuleType::ContactForm => {
                ModuleSettings::ContactForm(serde_json::from_value(value.clone())?)
            }
            ModuleType::PolicySection => {
                ModuleSettings::PolicySection(serde_json::from_value(value.clone())?)
            }
            ModuleType::BusinessHours => {
                ModuleSettings::BusinessHours(serde_json::from_value(value.clone())?)
            }
            ModuleType::PaymentMethods => {
                ModuleSettings::PaymentMethods(serde_json::from_value(value.clone())?)
            }
            ModuleType::CategoryShowcase => {
                ModuleSettings::CategoryShowcase(serde_json::from_value(value.clone())?)
            }
            ModuleType::AboutStore => {
                ModuleSettings::AboutStore(serde_json::from_value(value.clone())?)
            }
        };
        Ok(settings)
    }

    /// Shallow-merge a JSON patch into the settings. The reserved `enriched`
    /// key is skipped (it belongs to the enricher, not the editor). Returns
    /// false without modifying anything if the patched object no longer fits
    /// this variant's shape.
    pub fn apply_patch(&mut self, patch: &serde_json::Map<String, Value>) -> bool {
        let mut merged = match self.to_value() {
            Value::Object(map) => map,
            _ => return false,
        };
        for (key, value) in patch {
            if key == "enriched" {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
        match ModuleSettings::from_value(self.module_type(), &Value::Object(merged)) {
            Ok(updated) => {
                *self = updated;
                true
            }
            Err(_) => false,
        }
    }
}

/// One configurable content section of a storefront page.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    /// Unique within one document.
    pub id: String,
    pub module_type: ModuleType,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub enabled: bool,
    pub order: u32,
    pub settings: ModuleSettings,
}
