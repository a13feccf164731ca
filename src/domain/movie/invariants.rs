use super::entity::MovieSummary;
use crate::domain::{DomainError, DomainResult};

/// Validates all MovieSummary invariants
/// Applied before a movie is persisted as a favorite
pub fn validate_movie_summary(movie: &MovieSummary) -> DomainResult<()> {
    validate_id(movie.id)?;
    validate_vote_average(movie.vote_average)?;
    Ok(())
}

/// Remote ids are always positive
fn validate_id(id: i64) -> DomainResult<()> {
    if id <= 0 {
        return Err(DomainError::InvariantViolation(format!(
            "Movie id must be positive, got {}",
            id
        )));
    }
    Ok(())
}

fn validate_vote_average(vote_average: Option<f64>) -> DomainResult<()> {
    if let Some(avg) = vote_average {
        if !(0.0..=10.0).contains(&avg) {
            return Err(DomainError::InvariantViolation(format!(
                "Vote average {} is outside 0..=10",
                avg
            )));
        }
    }
    Ok(())
}

/// Invariants that must hold true for the Movie domain:
///
/// 1. Id is stable and unique within one remote source
/// 2. Vote average, when present, is within 0..=10
/// 3. Favorite flag is derived from the favorite set, never stored
