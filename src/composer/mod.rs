pub mod conflict;
pub mod enrich;
pub mod preview;
pub mod theme_engine;
