// src/events/handlers/mod.rs
//
// Event Handlers
//
// Handlers use closure-based subscription via EventBus::subscribe.

pub mod catalog_activity;

pub use catalog_activity::{register_catalog_handlers, ActivityTracker, CatalogActivity};
