// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod favorite;
pub mod movie;
pub mod pagination;
pub mod time_window;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{
    validate_movie_summary, CastMember, Credits, CrewMember, Genre, MovieDetails, MovieSummary,
    ProductionCompany, ProductionCountry, SpokenLanguage, TrendingPage,
};

// Favorites
pub use favorite::FavoriteRecord;

// Pagination
pub use pagination::PaginationCursor;

// Time Window
pub use time_window::TimeWindow;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
