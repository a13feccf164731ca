// src/events/handlers/catalog_activity.rs
//
// Catalog activity tracking
//
// Folds catalog events into a small snapshot the UI can show: whether
// trending data currently comes from the offline cache, and running counts
// of fetches, fallbacks and favorite changes.
//
// CRITICAL RULES:
// - Only consumes the four catalog events
// - A remotely fetched page clears the offline flag; an offline
//   fallback sets it
// - Never fails: a poisoned snapshot drops the update with an error log

use std::sync::{Arc, RwLock};

use crate::domain::TimeWindow;
use crate::events::types::{
    FavoriteAdded, FavoriteRemoved, TrendingCacheFallback, TrendingPageFetched,
};
use crate::events::EventBus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogActivity {
    pub pages_fetched: u64,
    pub cache_fallbacks: u64,
    pub favorites_added: u64,
    pub favorites_removed: u64,
    /// Last trending result was served from cache because the catalog was unreachable
    pub offline: bool,
    /// Window and cause of the most recent fallback
    pub last_fallback: Option<(TimeWindow, String)>,
}

/// Shared handle on the activity snapshot
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    activity: Arc<RwLock<CatalogActivity>>,
}

impl ActivityTracker {
    pub fn snapshot(&self) -> CatalogActivity {
        self.activity
            .read()
            .map(|activity| activity.clone())
            .unwrap_or_default()
    }

    pub fn is_offline(&self) -> bool {
        self.snapshot().offline
    }

    fn update<F: FnOnce(&mut CatalogActivity)>(&self, f: F) {
        match self.activity.write() {
            Ok(mut activity) => f(&mut activity),
            Err(_) => log::error!("Catalog activity snapshot poisoned; update dropped"),
        }
    }
}

// ============================================================================
// HANDLER REGISTRATION
// ============================================================================

/// Subscribe the activity handlers and return the tracker they feed
pub fn register_catalog_handlers(bus: &EventBus) -> ActivityTracker {
    let tracker = ActivityTracker::default();

    let fetched = tracker.clone();
    bus.subscribe::<TrendingPageFetched, _>(move |event| {
        fetched.update(|a| {
            a.pages_fetched += 1;
            if a.offline {
                log::info!("Catalog reachable again ({} page {})", event.window, event.page);
            }
            a.offline = false;
        });
    });

    let fallback = tracker.clone();
    bus.subscribe::<TrendingCacheFallback, _>(move |event| {
        fallback.update(|a| {
            a.cache_fallbacks += 1;
            if event.offline && !a.offline {
                log::warn!(
                    "Catalog offline; showing {} cached {} movies",
                    event.cached_count,
                    event.window
                );
            }
            a.offline = event.offline;
            a.last_fallback = Some((event.window, event.reason.clone()));
        });
    });

    let added = tracker.clone();
    bus.subscribe::<FavoriteAdded, _>(move |event| {
        log::debug!("Favorite added: {}", event.movie_id);
        added.update(|a| a.favorites_added += 1);
    });

    let removed = tracker.clone();
    bus.subscribe::<FavoriteRemoved, _>(move |event| {
        log::debug!("Favorite removed: {}", event.movie_id);
        removed.update(|a| a.favorites_removed += 1);
    });

    tracker
}
