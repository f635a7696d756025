pub mod catalog;
pub mod composer;
pub mod config;
pub mod domain;
pub mod error;
pub mod idempotency;
pub mod logging;
pub mod observability;
pub mod wire;

// Layered boundaries: application use cases and infrastructure adapters
pub mod app;
pub mod infra;
