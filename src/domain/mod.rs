pub mod document;
pub mod module;
pub mod module_list;
pub mod profile;
pub mod theme;
