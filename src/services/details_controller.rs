// src/services/details_controller.rs
//
// Movie details screen state
//
// Details, credits and favorite status load concurrently. Only a
// details failure is shown as an error; missing credits or an unreadable
// favorite flag degrade quietly. After a toggle the favorite flag is
// re-read from the store and pushed here directly, without waiting for
// the favorites stream.
//
// Once a reconciler has delivered a favorite set, that set decides the
// flag of a load that lands later; the store read taken when the load
// started may predate a toggle made meanwhile.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::ErrorResponse;
use crate::domain::{FavoriteRecord, MovieDetails};
use crate::error::AppResult;
use crate::services::favorite_reconciler::FavoriteAnnotated;
use crate::services::CatalogService;

pub const DETAILS_LOAD_ERROR: &str = "Failed to load movie details.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub movie: Option<MovieDetails>,
    pub is_favorite: bool,
    /// Movie the latest load was issued for
    requested_id: Option<i64>,
    /// Last favorite set delivered by a reconciler
    favorite_ids: Option<HashSet<i64>>,
}

impl DetailsState {
    /// Flag for a movie whose load just landed
    fn settle_favorite(&self, movie_id: i64, stored: bool) -> bool {
        match &self.favorite_ids {
            Some(ids) => ids.contains(&movie_id),
            None => stored,
        }
    }
}

impl FavoriteAnnotated for DetailsState {
    fn apply_favorites(&mut self, favorite_ids: &HashSet<i64>) -> bool {
        self.favorite_ids = Some(favorite_ids.clone());
        let Some(movie) = &self.movie else {
            return false;
        };
        let is_favorite = favorite_ids.contains(&movie.id);
        if is_favorite == self.is_favorite {
            return false;
        }
        self.is_favorite = is_favorite;
        true
    }
}

pub struct MovieDetailsController {
    catalog: Arc<CatalogService>,
    state: Arc<watch::Sender<DetailsState>>,
}

impl MovieDetailsController {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        let (state, _) = watch::channel(DetailsState::default());
        Self {
            catalog,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DetailsState {
        self.state.borrow().clone()
    }

    pub(crate) fn state_handle(&self) -> &Arc<watch::Sender<DetailsState>> {
        &self.state
    }

    pub async fn load(&self, movie_id: i64) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
            s.requested_id = Some(movie_id);
        });

        let (details, credits, is_favorite) = tokio::join!(
            self.catalog.fetch_details(movie_id),
            self.catalog.fetch_credits(movie_id),
            self.catalog.is_favorite(movie_id),
        );

        let credits = credits
            .map_err(|e| log::warn!("Credits for movie {} unavailable: {}", movie_id, e))
            .ok();
        let is_favorite = is_favorite.unwrap_or_else(|e| {
            log::warn!("Favorite lookup for movie {} failed: {}", movie_id, e);
            false
        });

        self.state.send_if_modified(|s| {
            if s.requested_id != Some(movie_id) {
                return false;
            }
            s.is_loading = false;
            match details {
                Ok(mut movie) => {
                    movie.credits = credits;
                    s.is_favorite = s.settle_favorite(movie.id, is_favorite);
                    s.movie = Some(movie);
                    s.error = None;
                }
                Err(e) => {
                    log::warn!("Details for movie {} failed: {}", movie_id, e);
                    s.movie = None;
                    s.is_favorite = false;
                    s.error = Some(DETAILS_LOAD_ERROR.to_string());
                }
            }
            true
        });
    }

    /// Toggle the shown movie's favorite status, then re-read it from the
    /// store. A no-op when no movie is loaded.
    pub async fn toggle_favorite(&self) {
        let shown = self.state.borrow().movie.clone();
        let Some(movie) = shown else {
            return;
        };

        match self.toggle_and_reread(&movie).await {
            Ok(is_favorite) => {
                self.state.send_if_modified(|s| {
                    if s.movie.as_ref().map(|m| m.id) != Some(movie.id) {
                        return false;
                    }
                    s.is_favorite = is_favorite;
                    true
                });
            }
            Err(e) => {
                log::error!("Failed to toggle favorite for movie {}: {}", movie.id, e);
                let response = ErrorResponse::from_app_error(e);
                self.state.send_modify(|s| {
                    s.error = Some(format!("Failed to toggle favorite: {}", response.message));
                });
            }
        }
    }

    async fn toggle_and_reread(&self, movie: &MovieDetails) -> AppResult<bool> {
        self.catalog
            .toggle_favorite(FavoriteRecord::from(movie))
            .await?;
        self.catalog.is_favorite(movie.id).await
    }
}
