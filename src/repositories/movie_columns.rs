// src/repositories/movie_columns.rs
//
// Column mapping shared by the trending cache and favorites tables.
// Both tables carry the same denormalized summary columns.

use rusqlite::Row;

use crate::domain::MovieSummary;

pub(crate) const SUMMARY_COLUMNS: &str = "id, title, original_title, overview, poster_path, \
     backdrop_path, release_date, vote_average, vote_count, popularity, adult, genre_ids, \
     original_language, video";

/// Map summary columns to MovieSummary - returns rusqlite::Error for query_map compatibility
///
/// The favorite flag is left false; callers stamp it.
pub(crate) fn row_to_summary(row: &Row) -> Result<MovieSummary, rusqlite::Error> {
    let genre_json: String = row.get("genre_ids")?;
    let genre_ids: Vec<i64> = serde_json::from_str(&genre_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(MovieSummary {
        id: row.get("id")?,
        title: row.get("title")?,
        original_title: row.get("original_title")?,
        overview: row.get("overview")?,
        poster_path: row.get("poster_path")?,
        backdrop_path: row.get("backdrop_path")?,
        release_date: row.get("release_date")?,
        vote_average: row.get("vote_average")?,
        vote_count: row.get("vote_count")?,
        popularity: row.get("popularity")?,
        adult: row.get("adult")?,
        genre_ids,
        original_language: row.get("original_language")?,
        video: row.get("video")?,
        is_favorite: false,
    })
}

pub(crate) fn genre_ids_json(movie: &MovieSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string(&movie.genre_ids)
}
