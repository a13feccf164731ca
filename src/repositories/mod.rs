// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic (fallback, pagination, reconciliation live in services)
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod favorite_repository;
pub mod movie_cache_repository;
mod movie_columns;

pub use favorite_repository::{FavoriteRepository, SqliteFavoriteRepository};
pub use movie_cache_repository::{MovieCacheRepository, SqliteMovieCacheRepository};
