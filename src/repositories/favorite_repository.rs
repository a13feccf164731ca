// src/repositories/favorite_repository.rs
//
// Favorites persistence
//
// Presence of a row is the only source of truth for "is favorite".
// Every committed write re-publishes the full favorite set on a watch
// channel (a snapshot, not a diff).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::db::ConnectionPool;
use crate::domain::{validate_movie_summary, FavoriteRecord};
use crate::error::{AppError, AppResult};
use crate::repositories::movie_columns::{genre_ids_json, row_to_summary, SUMMARY_COLUMNS};

pub trait FavoriteRepository: Send + Sync {
    fn upsert(&self, record: &FavoriteRecord) -> AppResult<()>;

    /// Deleting a missing favorite is a no-op
    fn delete(&self, movie_id: i64) -> AppResult<()>;

    fn exists(&self, movie_id: i64) -> AppResult<bool>;

    fn list_all(&self) -> AppResult<Vec<FavoriteRecord>>;

    /// Read-then-write as one unit: deletes the favorite if present,
    /// inserts `record` otherwise. Returns the new favorite status.
    fn toggle(&self, record: &FavoriteRecord) -> AppResult<bool>;

    /// Live favorite set; the current value is available immediately
    fn subscribe(&self) -> watch::Receiver<Vec<FavoriteRecord>>;
}

pub struct SqliteFavoriteRepository {
    pool: Arc<ConnectionPool>,
    changes: watch::Sender<Vec<FavoriteRecord>>,
    publish_lock: Mutex<()>,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> AppResult<Self> {
        let initial = {
            let conn = pool.get()?;
            Self::select_all(&conn)?
        };

        let (changes, _) = watch::channel(initial);

        Ok(Self {
            pool,
            changes,
            publish_lock: Mutex::new(()),
        })
    }

    fn row_to_record(row: &Row) -> Result<FavoriteRecord, rusqlite::Error> {
        let movie = row_to_summary(row)?.with_favorite(true);

        let favorited_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("favorited_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(FavoriteRecord {
            movie,
            favorited_at,
        })
    }

    fn select_all(conn: &Connection) -> AppResult<Vec<FavoriteRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, favorited_at FROM favorites ORDER BY favorited_at, id",
            SUMMARY_COLUMNS
        ))?;

        let records: Vec<FavoriteRecord> = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn insert(conn: &Connection, record: &FavoriteRecord) -> AppResult<()> {
        validate_movie_summary(&record.movie)?;

        let movie = &record.movie;
        conn.execute(
            "INSERT OR REPLACE INTO favorites (
                id, title, original_title, overview, poster_path, backdrop_path,
                release_date, vote_average, vote_count, popularity, adult, genre_ids,
                original_language, video, favorited_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                movie.id,
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
                record.favorited_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn exists_on(conn: &Connection, movie_id: i64) -> AppResult<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE id = ?1)",
            params![movie_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Re-read the full set and push it to subscribers.
    ///
    /// Serialized so the last publish always carries the latest committed set.
    /// The write has already committed, so a failure here is logged, not returned.
    fn publish(&self) {
        let result = (|| -> AppResult<()> {
            let _guard = self
                .publish_lock
                .lock()
                .map_err(|_| AppError::Other("Favorites publish lock poisoned".to_string()))?;
            let conn = self.pool.get()?;
            let records = Self::select_all(&conn)?;
            self.changes.send_replace(records);
            Ok(())
        })();

        if let Err(e) = result {
            log::error!("Failed to publish favorite changes: {}", e);
        }
    }
}

impl FavoriteRepository for SqliteFavoriteRepository {
    fn upsert(&self, record: &FavoriteRecord) -> AppResult<()> {
        {
            let conn = self.pool.get()?;
            Self::insert(&conn, record)?;
        }
        self.publish();
        Ok(())
    }

    fn delete(&self, movie_id: i64) -> AppResult<()> {
        let rows_affected = {
            let conn = self.pool.get()?;
            conn.execute("DELETE FROM favorites WHERE id = ?1", params![movie_id])?
        };

        if rows_affected > 0 {
            self.publish();
        }
        Ok(())
    }

    fn exists(&self, movie_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        Self::exists_on(&conn, movie_id)
    }

    fn list_all(&self) -> AppResult<Vec<FavoriteRecord>> {
        let conn = self.pool.get()?;
        Self::select_all(&conn)
    }

    fn toggle(&self, record: &FavoriteRecord) -> AppResult<bool> {
        let now_favorite = {
            let mut conn = self.pool.get()?;
            // IMMEDIATE takes the write lock before the read, so two rapid
            // toggles on the same id cannot both observe the same state.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let now_favorite = if Self::exists_on(&tx, record.id())? {
                tx.execute("DELETE FROM favorites WHERE id = ?1", params![record.id()])?;
                false
            } else {
                Self::insert(&tx, record)?;
                true
            };

            tx.commit()?;
            now_favorite
        };

        self.publish();
        Ok(now_favorite)
    }

    fn subscribe(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.changes.subscribe()
    }
}
