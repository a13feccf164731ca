// src/domain/favorite.rs
//
// Favorite Record Entity
//
// A denormalized copy of a movie summary, kept independently of the
// trending cache so favorites stay viewable after eviction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::movie::{MovieDetails, MovieSummary};

/// A favorited movie
///
/// CRITICAL INVARIANTS:
/// - Presence of a record is the sole source of truth for "is favorite"
/// - Keyed by movie id; at most one record per movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub movie: MovieSummary,

    /// When the movie was favorited
    pub favorited_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(movie: MovieSummary) -> Self {
        Self {
            movie: movie.with_favorite(true),
            favorited_at: Utc::now(),
        }
    }

    pub fn id(&self) -> i64 {
        self.movie.id
    }

    /// Summary view; the favorite flag is always true
    pub fn into_summary(self) -> MovieSummary {
        self.movie.with_favorite(true)
    }
}

impl From<&MovieSummary> for FavoriteRecord {
    fn from(movie: &MovieSummary) -> Self {
        FavoriteRecord::new(movie.clone())
    }
}

impl From<&MovieDetails> for FavoriteRecord {
    fn from(details: &MovieDetails) -> Self {
        FavoriteRecord::new(details.to_summary())
    }
}
