// src/services/catalog_service.rs
//
// Catalog Service - remote fetch with last-known-good cache fallback
//
// RULES:
// - A successful trending fetch replaces the window's whole cache partition
// - A failed trending fetch serves the cached partition as a single page
// - The trending fetch never returns an error; it degrades to empty
// - Details and credits are never cached and DO propagate errors
// - Favorite status is always read from the store, never from memory

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{Credits, FavoriteRecord, MovieDetails, MovieSummary, TimeWindow, TrendingPage};
use crate::error::{AppError, AppResult};
use crate::events::{
    EventBus, FavoriteAdded, FavoriteRemoved, TrendingCacheFallback, TrendingPageFetched,
};
use crate::integrations::CatalogSource;
use crate::repositories::{FavoriteRepository, MovieCacheRepository};
use crate::services::run_blocking;

pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    cache_repo: Arc<dyn MovieCacheRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,
    event_bus: Arc<EventBus>,
}

impl CatalogService {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        cache_repo: Arc<dyn MovieCacheRepository>,
        favorite_repo: Arc<dyn FavoriteRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            source,
            cache_repo,
            favorite_repo,
            event_bus,
        }
    }

    // ========================================================================
    // TRENDING
    // ========================================================================

    /// Fetch one trending page, falling back to the cached partition.
    ///
    /// Favorite flags on the returned rows are NOT stamped; the caller
    /// owns that annotation.
    pub async fn fetch_page(&self, window: TimeWindow, page: u32) -> TrendingPage {
        match self.source.get_trending(window, page).await {
            Ok(response) => self.store_page(window, page, response).await,
            Err(err) => self.cache_fallback(window, page, err).await,
        }
    }

    async fn store_page(&self, window: TimeWindow, page: u32, response: TrendingPage) -> TrendingPage {
        let rows = response.results.clone();
        let stored = run_blocking(&self.cache_repo, move |repo| {
            repo.replace_partition(window, &rows)
        })
        .await;

        // The fetch itself succeeded; a cache write failure only costs
        // the next offline session its snapshot.
        if let Err(e) = stored {
            log::error!("Failed to cache trending {} page {}: {}", window, page, e);
        }

        self.event_bus.emit(TrendingPageFetched::new(
            window,
            page,
            response.results.len(),
            response.total_pages,
        ));

        response
    }

    /// Serve the last-known-good partition. `page` is ignored: the cache
    /// only ever holds the rows of the last successful fetch.
    async fn cache_fallback(&self, window: TimeWindow, page: u32, cause: AppError) -> TrendingPage {
        let offline = cause.is_transport();
        if offline {
            log::warn!(
                "Trending {} page {} unavailable ({}); serving cache",
                window,
                page,
                cause
            );
        } else {
            log::error!(
                "Trending {} page {} could not be read ({}); serving cache",
                window,
                page,
                cause
            );
        }

        let cached = run_blocking(&self.cache_repo, move |repo| repo.query_partition(window))
            .await
            .unwrap_or_else(|e| {
                log::error!("Cache read for {} failed too: {}", window, e);
                Vec::new()
            });

        self.event_bus.emit(TrendingCacheFallback::new(
            window,
            page,
            cached.len(),
            cause.to_string(),
            offline,
        ));

        TrendingPage::from_cache(cached)
    }

    // ========================================================================
    // DETAILS
    // ========================================================================

    pub async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        self.source.get_details(movie_id).await
    }

    pub async fn fetch_credits(&self, movie_id: i64) -> AppResult<Credits> {
        self.source.get_credits(movie_id).await
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    /// Live favorites list for the favorites screen
    pub fn observe_favorites(&self) -> FavoritesWatch {
        FavoritesWatch {
            changes: self.favorite_repo.subscribe(),
        }
    }

    /// Raw favorite-set stream, one full snapshot per change
    pub fn favorite_changes(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.favorite_repo.subscribe()
    }

    pub async fn add_favorite(&self, movie: &MovieSummary) -> AppResult<()> {
        let record = FavoriteRecord::from(movie);
        let movie_id = record.id();
        run_blocking(&self.favorite_repo, move |repo| repo.upsert(&record)).await?;
        self.event_bus.emit(FavoriteAdded::new(movie_id));
        Ok(())
    }

    pub async fn remove_favorite(&self, movie_id: i64) -> AppResult<()> {
        run_blocking(&self.favorite_repo, move |repo| repo.delete(movie_id)).await?;
        self.event_bus.emit(FavoriteRemoved::new(movie_id));
        Ok(())
    }

    pub async fn is_favorite(&self, movie_id: i64) -> AppResult<bool> {
        run_blocking(&self.favorite_repo, move |repo| repo.exists(movie_id)).await
    }

    /// Flip the stored favorite status as one unit. Returns the new status.
    pub async fn toggle_favorite(&self, record: FavoriteRecord) -> AppResult<bool> {
        let movie_id = record.id();
        let now_favorite = run_blocking(&self.favorite_repo, move |repo| repo.toggle(&record)).await?;

        if now_favorite {
            self.event_bus.emit(FavoriteAdded::new(movie_id));
        } else {
            self.event_bus.emit(FavoriteRemoved::new(movie_id));
        }
        log::info!("Movie {} favorite = {}", movie_id, now_favorite);

        Ok(now_favorite)
    }
}

/// Favorites as movie summaries (flag always true)
pub struct FavoritesWatch {
    changes: watch::Receiver<Vec<FavoriteRecord>>,
}

impl FavoritesWatch {
    /// Current favorites; marks them as seen
    pub fn current(&mut self) -> Vec<MovieSummary> {
        Self::summaries(&self.changes.borrow_and_update())
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Vec<MovieSummary>> {
        self.changes.changed().await.ok()?;
        Some(self.current())
    }

    fn summaries(records: &[FavoriteRecord]) -> Vec<MovieSummary> {
        records.iter().cloned().map(FavoriteRecord::into_summary).collect()
    }
}
