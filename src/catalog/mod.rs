pub mod module_registry;
pub mod theme_catalog;
