// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::TimeWindow;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ty, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                $name
            }
        }
    };
}

// ============================================================================
// TRENDING EVENTS
// ============================================================================

/// Emitted when a trending page was fetched remotely and cached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingPageFetched {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub page: u32,
    pub movie_count: usize,
    pub total_pages: u32,
}

impl TrendingPageFetched {
    pub fn new(window: TimeWindow, page: u32, movie_count: usize, total_pages: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            window,
            page,
            movie_count,
            total_pages,
        }
    }
}

impl_domain_event!(TrendingPageFetched, "TrendingPageFetched");

/// Emitted when a remote fetch failed and the cached partition was served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCacheFallback {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub requested_page: u32,
    pub cached_count: usize,
    pub reason: String,
    /// The catalog was unreachable or answered non-2xx, as opposed to an
    /// unreadable response
    pub offline: bool,
}

impl TrendingCacheFallback {
    pub fn new(
        window: TimeWindow,
        requested_page: u32,
        cached_count: usize,
        reason: String,
        offline: bool,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            window,
            requested_page,
            cached_count,
            reason,
            offline,
        }
    }
}

impl_domain_event!(TrendingCacheFallback, "TrendingCacheFallback");

// ============================================================================
// FAVORITE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
}

impl FavoriteAdded {
    pub fn new(movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
        }
    }
}

impl_domain_event!(FavoriteAdded, "FavoriteAdded");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
}

impl FavoriteRemoved {
    pub fn new(movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
        }
    }
}

impl_domain_event!(FavoriteRemoved, "FavoriteRemoved");
