// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: the type-erased handler is INTERNAL and must NOT be exported

pub mod bus;
pub mod handlers;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Favorites
    FavoriteAdded,
    FavoriteRemoved,
    // Trending
    TrendingCacheFallback,
    TrendingPageFetched,
};

pub use bus::{EventBus, EventLogEntry};

pub use handlers::{register_catalog_handlers, ActivityTracker, CatalogActivity};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
