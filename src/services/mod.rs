// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod details_controller;
pub mod favorite_reconciler;
pub mod pagination_controller;

#[cfg(test)]
mod trending_sync_tests;

use std::sync::Arc;

use crate::error::AppResult;

// Re-export all services and their types
pub use catalog_service::{CatalogService, FavoritesWatch};

pub use details_controller::{DetailsState, MovieDetailsController, DETAILS_LOAD_ERROR};

pub use favorite_reconciler::{favorite_ids, restamp, FavoriteAnnotated, FavoriteReconciler};

pub use pagination_controller::{FeedState, PaginationController};

/// Run a synchronous repository call on the blocking pool
pub(crate) async fn run_blocking<R, T, F>(repo: &Arc<R>, f: F) -> AppResult<T>
where
    R: ?Sized + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&R) -> AppResult<T> + Send + 'static,
{
    let repo = Arc::clone(repo);
    tokio::task::spawn_blocking(move || f(repo.as_ref())).await?
}
