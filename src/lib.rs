// src/lib.rs
// MovieHub - Local-first trending movie catalog
//
// Architecture:
// - Domain-centric: movie records, favorites, cursors and windows live in domain
// - Repositories are dumb mappers over SQLite
// - Services own fallback, pagination and favorite reconciliation
// - Offline-first: the last good trending page per window is always on disk
// - Application Layer: wired state + user-facing errors

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_movie_summary, CastMember, Credits, CrewMember, FavoriteRecord, Genre,
    MovieDetails, MovieSummary, PaginationCursor, TimeWindow, TrendingPage,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::CatalogConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, register_catalog_handlers, ActivityTracker, CatalogActivity, DomainEvent,
    EventBus, EventLogEntry, FavoriteAdded, FavoriteRemoved, TrendingCacheFallback,
    TrendingPageFetched,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    FavoriteRepository, MovieCacheRepository, SqliteFavoriteRepository,
    SqliteMovieCacheRepository,
};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CatalogSource, TmdbClient};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Catalog Service
    CatalogService,
    // Details
    DetailsState,
    // Favorite Reconciler
    FavoriteAnnotated,
    FavoriteReconciler,
    FavoritesWatch,
    // Pagination Controller
    FeedState,
    MovieDetailsController,
    PaginationController,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};
