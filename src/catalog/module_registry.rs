use crate::domain::module::{ModuleSettings, ModuleType};

/// Registry definition a module instance is created from. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleTemplate {
    pub module_type: ModuleType,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Settings field names that must be non-empty before publish.
    pub required_settings: &'static [&'static str],
    pub premium: bool,
}

impl ModuleTemplate {
    /// Fresh clone of the type's default settings for a new instance.
    pub fn default_settings(&self) -> ModuleSettings {
        ModuleSettings::default_for(self.module_type)
    }
}

/// Static catalog of module templates. Constructed once at startup and
/// passed by reference so tests can inject doubles. The table is complete
/// over [`ModuleType`], which makes an unknown-type lookup unrepresentable
/// rather than a runtime fallback.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    templates: Vec<ModuleTemplate>,
}

impl ModuleRegistry {
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.to_vec(),
        }
    }

    pub fn template_for(&self, module_type: ModuleType) -> &ModuleTemplate {
        // The constructor registers one template per type, in ALL order.
        &self.templates[module_type as usize]
    }

    pub fn templates(&self) -> &[ModuleTemplate] {
        &self.templates
    }
}

const BUILTIN_TEMPLATES: [ModuleTemplate; 8] = [
    ModuleTemplate {
        module_type: ModuleType::HeroBanner,
        name: "Hero banner",
        description: "Large welcome banner with headline and call to action",
        icon: "image",
        required_settings: &["title"],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::FeaturedProducts,
        name: "Featured products",
        description: "Showcase selected products from your inventory",
        icon: "star",
        required_settings: &[],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::ContactForm,
        name: "Contact form",
        description: "Let visitors send you a message",
        icon: "mail",
        required_settings: &["heading"],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::PolicySection,
        name: "Store policies",
        description: "Shipping, returns and other store policies",
        icon: "file-text",
        required_settings: &[],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::BusinessHours,
        name: "Opening hours",
        description: "Weekly opening hours from your store profile",
        icon: "clock",
        required_settings: &[],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::PaymentMethods,
        name: "Payment methods",
        description: "Accepted ways to pay",
        icon: "credit-card",
        required_settings: &[],
        premium: false,
    },
    ModuleTemplate {
        module_type: ModuleType::CategoryShowcase,
        name: "Category showcase",
        description: "Grid of your product categories",
        icon: "grid",
        required_settings: &[],
        premium: true,
    },
    ModuleTemplate {
        module_type: ModuleType::AboutStore,
        name: "About the store",
        description: "Tell visitors who you are",
        icon: "info",
        required_settings: &["body"],
        premium: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_module_type() {
        let registry = ModuleRegistry::builtin();
        for module_type in ModuleType::ALL {
            let template = registry.template_for(module_type);
            assert_eq!(template.module_type, module_type);
        }
    }

    #[test]
    fn hero_banner_requires_a_title() {
        let registry = ModuleRegistry::builtin();
        let template = registry.template_for(ModuleType::HeroBanner);
        assert!(template.required_settings.contains(&"title"));
    }
}
