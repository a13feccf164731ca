// src/services/favorite_reconciler.rs
//
// Favorite Reconciler - keeps held lists in step with the favorite set
//
// CRITICAL RULES:
// - On every favorites emission, re-stamp whatever is currently held
// - Re-stamping is pure: no network, no cache-partition read
// - Toggles go to the store; the held flag changes only when the stream
//   re-emits

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{FavoriteRecord, MovieSummary};
use crate::error::AppResult;
use crate::services::CatalogService;

/// State that carries derived favorite annotations
pub trait FavoriteAnnotated {
    /// Recompute favorite flags from `favorite_ids`.
    /// Returns true if observers should be notified.
    fn apply_favorites(&mut self, favorite_ids: &HashSet<i64>) -> bool;
}

/// Ids in a favorites snapshot
pub fn favorite_ids(records: &[FavoriteRecord]) -> HashSet<i64> {
    records.iter().map(FavoriteRecord::id).collect()
}

/// Re-stamp every movie in place. Returns true if any flag changed.
pub fn restamp(movies: &mut [MovieSummary], favorite_ids: &HashSet<i64>) -> bool {
    let mut changed = false;
    for movie in movies.iter_mut() {
        let is_favorite = favorite_ids.contains(&movie.id);
        if movie.is_favorite != is_favorite {
            movie.is_favorite = is_favorite;
            changed = true;
        }
    }
    changed
}

/// Stamp freshly fetched rows before they join a held list
pub fn stamp(mut movies: Vec<MovieSummary>, favorite_ids: &HashSet<i64>) -> Vec<MovieSummary> {
    restamp(&mut movies, favorite_ids);
    movies
}

pub struct FavoriteReconciler {
    catalog: Arc<CatalogService>,
}

impl FavoriteReconciler {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// Follow the favorites stream for as long as `target` is alive.
    ///
    /// The current favorite set is applied immediately. The task ends
    /// once the target is dropped (checked on the next emission) or the
    /// favorites store goes away.
    pub fn attach<T>(&self, target: &Arc<watch::Sender<T>>) -> JoinHandle<()>
    where
        T: FavoriteAnnotated + Send + Sync + 'static,
    {
        let target = Arc::downgrade(target);
        let mut changes = self.catalog.favorite_changes();

        tokio::spawn(async move {
            loop {
                let ids = favorite_ids(&changes.borrow_and_update());

                match target.upgrade() {
                    Some(target) => {
                        target.send_if_modified(|state| state.apply_favorites(&ids));
                    }
                    None => break,
                }

                if changes.changed().await.is_err() {
                    break;
                }
            }
            log::debug!("Favorite reconciler detached");
        })
    }

    /// Flip a movie's favorite status in the store.
    ///
    /// Does not touch any held list; attached states update when the
    /// favorites stream re-emits.
    pub async fn toggle_favorite(&self, movie: &MovieSummary) -> AppResult<bool> {
        self.catalog.toggle_favorite(FavoriteRecord::from(movie)).await
    }

    pub async fn is_favorite(&self, movie_id: i64) -> AppResult<bool> {
        self.catalog.is_favorite(movie_id).await
    }
}
