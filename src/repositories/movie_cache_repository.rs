// src/repositories/movie_cache_repository.rs
//
// Trending cache persistence
//
// One partition per time window, holding the rows of the most recent
// successful fetch. A replace is delete-then-insert inside a single
// transaction: readers see either the old partition or the new one.

use chrono::Utc;
use rusqlite::{params, TransactionBehavior};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{MovieSummary, TimeWindow};
use crate::error::AppResult;
use crate::repositories::movie_columns::{genre_ids_json, row_to_summary, SUMMARY_COLUMNS};

pub trait MovieCacheRepository: Send + Sync {
    /// Rows of the partition, in the order they were fetched
    fn query_partition(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>>;

    /// Atomically replace the whole partition with `movies`
    fn replace_partition(&self, window: TimeWindow, movies: &[MovieSummary]) -> AppResult<()>;

    fn partition_size(&self, window: TimeWindow) -> AppResult<usize>;
}

pub struct SqliteMovieCacheRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMovieCacheRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl MovieCacheRepository for SqliteMovieCacheRepository {
    fn query_partition(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM trending_movies
             WHERE time_window = ?1
             ORDER BY position",
            SUMMARY_COLUMNS
        ))?;

        let movies: Vec<MovieSummary> = stmt
            .query_map(params![window.token()], row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn replace_partition(&self, window: TimeWindow, movies: &[MovieSummary]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let cached_at = Utc::now().to_rfc3339();

        tx.execute(
            "DELETE FROM trending_movies WHERE time_window = ?1",
            params![window.token()],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO trending_movies (
                    time_window, id, position, title, original_title, overview,
                    poster_path, backdrop_path, release_date, vote_average, vote_count,
                    popularity, adult, genre_ids, original_language, video, cached_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            )?;

            for (position, movie) in movies.iter().enumerate() {
                stmt.execute(params![
                    window.token(),
                    movie.id,
                    position as i64,
                    movie.title,
                    movie.original_title,
                    movie.overview,
                    movie.poster_path,
                    movie.backdrop_path,
                    movie.release_date,
                    movie.vote_average,
                    movie.vote_count,
                    movie.popularity,
                    movie.adult,
                    genre_ids_json(movie)?,
                    movie.original_language,
                    movie.video,
                    cached_at,
                ])?;
            }
        }

        tx.commit()?;

        Ok(())
    }

    fn partition_size(&self, window: TimeWindow) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM trending_movies WHERE time_window = ?1",
            params![window.token()],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;

    fn movies(ids: std::ops::RangeInclusive<i64>) -> Vec<MovieSummary> {
        ids.map(|id| {
            let mut movie = MovieSummary::new(id, format!("Movie {}", id));
            movie.genre_ids = vec![28, id];
            movie.vote_average = Some(7.5);
            movie
        })
        .collect()
    }

    #[test]
    fn test_empty_partition() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteMovieCacheRepository::new(pool);

        assert!(repo.query_partition(TimeWindow::Today).unwrap().is_empty());
        assert_eq!(repo.partition_size(TimeWindow::Today).unwrap(), 0);
    }

    #[test]
    fn test_replace_then_query_preserves_order_and_fields() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteMovieCacheRepository::new(pool);

        let mut rows = movies(1..=3);
        rows.reverse();
        repo.replace_partition(TimeWindow::Today, &rows).unwrap();

        let cached = repo.query_partition(TimeWindow::Today).unwrap();
        assert_eq!(cached, rows);
        assert_eq!(cached[0].genre_ids, vec![28, 3]);
    }

    #[test]
    fn test_replace_discards_previous_rows() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteMovieCacheRepository::new(pool);

        repo.replace_partition(TimeWindow::Today, &movies(1..=20)).unwrap();
        repo.replace_partition(TimeWindow::Today, &movies(21..=25)).unwrap();

        let cached = repo.query_partition(TimeWindow::Today).unwrap();
        let ids: Vec<i64> = cached.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteMovieCacheRepository::new(pool);
        let rows = movies(1..=5);

        repo.replace_partition(TimeWindow::ThisWeek, &rows).unwrap();
        let first = repo.query_partition(TimeWindow::ThisWeek).unwrap();

        repo.replace_partition(TimeWindow::ThisWeek, &rows).unwrap();
        let second = repo.query_partition(TimeWindow::ThisWeek).unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.partition_size(TimeWindow::ThisWeek).unwrap(), 5);
    }

    #[test]
    fn test_partitions_are_independent() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteMovieCacheRepository::new(pool);

        repo.replace_partition(TimeWindow::Today, &movies(1..=3)).unwrap();
        repo.replace_partition(TimeWindow::ThisWeek, &movies(2..=6)).unwrap();
        repo.replace_partition(TimeWindow::Today, &[]).unwrap();

        assert_eq!(repo.partition_size(TimeWindow::Today).unwrap(), 0);
        assert_eq!(repo.partition_size(TimeWindow::ThisWeek).unwrap(), 5);
    }

    #[test]
    fn test_concurrent_reader_never_sees_partial_partition() {
        let (_dir, pool) = create_test_pool();
        let repo = Arc::new(SqliteMovieCacheRepository::new(pool));
        repo.replace_partition(TimeWindow::Today, &movies(1..=50)).unwrap();

        let writer = {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                for round in 0..20 {
                    let start = if round % 2 == 0 { 101 } else { 1 };
                    repo.replace_partition(TimeWindow::Today, &movies(start..=start + 49))
                        .unwrap();
                }
            })
        };

        for _ in 0..50 {
            let size = repo.query_partition(TimeWindow::Today).unwrap().len();
            assert_eq!(size, 50, "reader observed a half-replaced partition");
        }

        writer.join().unwrap();
    }
}
