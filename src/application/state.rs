// src/application/state.rs
//
// Application state: the wired-up object graph the UI talks to.
//
// Must be built inside a tokio runtime; the favorite reconciler tasks are
// spawned here and aborted when the state is dropped.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::CatalogConfig;
use crate::db::{
    create_connection_pool, get_connection, get_database_path, get_database_stats,
    initialize_database, verify_database_integrity, ConnectionPool,
};
use crate::domain::TimeWindow;
use crate::error::AppResult;
use crate::events::{create_event_bus, register_catalog_handlers, ActivityTracker, EventBus};
use crate::integrations::{CatalogSource, TmdbClient};
use crate::repositories::{
    FavoriteRepository, MovieCacheRepository, SqliteFavoriteRepository,
    SqliteMovieCacheRepository,
};
use crate::services::{
    CatalogService, FavoriteReconciler, MovieDetailsController, PaginationController,
};

/// All fields are Arc-wrapped for thread-safe sharing across UI handlers.
pub struct AppState {
    pub config: CatalogConfig,
    pub event_bus: Arc<EventBus>,
    pub activity: ActivityTracker,
    pub pool: Arc<ConnectionPool>,
    pub catalog_service: Arc<CatalogService>,
    pub trending: Arc<PaginationController>,
    pub details: Arc<MovieDetailsController>,
    pub reconciler: Arc<FavoriteReconciler>,
    reconciler_tasks: Vec<JoinHandle<()>>,
}

impl AppState {
    /// Open (or create) the database and wire the TMDB client
    pub fn initialize(config: CatalogConfig) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let db_path = get_database_path(&config)?;
        log::info!("Opening catalog database at {}", db_path.display());

        let pool = Arc::new(create_connection_pool(&db_path)?);
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;

            let stats = get_database_stats(&conn)?;
            log::info!(
                "Database ready: {} cached movies, {} favorites, {} bytes",
                stats.cached_movie_count,
                stats.favorite_count,
                stats.size_bytes
            );
        }

        // 2. REMOTE SOURCE
        if config.api_token.is_none() {
            log::warn!("MOVIEHUB_API_TOKEN is not set; remote requests will be rejected");
        }
        let source: Arc<dyn CatalogSource> = Arc::new(TmdbClient::new(&config)?);

        Self::with_source(config, pool, source)
    }

    /// Wire the services over an initialized pool and any catalog source
    pub fn with_source(
        config: CatalogConfig,
        pool: Arc<ConnectionPool>,
        source: Arc<dyn CatalogSource>,
    ) -> AppResult<Self> {
        let event_bus = Arc::new(create_event_bus());
        let activity = register_catalog_handlers(&event_bus);

        // REPOSITORIES
        let cache_repo: Arc<dyn MovieCacheRepository> =
            Arc::new(SqliteMovieCacheRepository::new(pool.clone()));
        let favorite_repo: Arc<dyn FavoriteRepository> =
            Arc::new(SqliteFavoriteRepository::new(pool.clone())?);

        // SERVICES
        let catalog_service = Arc::new(CatalogService::new(
            source,
            cache_repo,
            favorite_repo,
            event_bus.clone(),
        ));
        let trending = Arc::new(PaginationController::new(
            catalog_service.clone(),
            TimeWindow::default(),
        ));
        let details = Arc::new(MovieDetailsController::new(catalog_service.clone()));
        let reconciler = Arc::new(FavoriteReconciler::new(catalog_service.clone()));

        // RECONCILIATION WIRING
        let reconciler_tasks = vec![
            reconciler.attach(trending.state_handle()),
            reconciler.attach(details.state_handle()),
        ];

        Ok(Self {
            config,
            event_bus,
            activity,
            pool,
            catalog_service,
            trending,
            details,
            reconciler,
            reconciler_tasks,
        })
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        for task in &self.reconciler_tasks {
            task.abort();
        }
    }
}
