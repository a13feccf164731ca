// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::config::CatalogConfig;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Resolve the database file path
///
/// Uses the configured path when set, otherwise the application data
/// directory: {APP_DATA}/moviehub/moviehub.db
pub fn get_database_path(config: &CatalogConfig) -> AppResult<PathBuf> {
    let path = match &config.database_path {
        Some(path) => path.clone(),
        None => {
            let app_data_dir = dirs::data_dir().ok_or_else(|| {
                AppError::Other("Could not determine app data directory".to_string())
            })?;
            app_data_dir.join("moviehub").join("moviehub.db")
        }
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(path)
}

/// Create a connection pool over the given database file
///
/// Pool configuration:
/// - Max 8 connections (reads and writes are short)
/// - WAL mode: readers keep the last committed snapshot, so a partition
///   replace is never observed half-done
/// - Busy timeout set to avoid immediate errors on concurrent writers
pub fn create_connection_pool(db_path: &Path) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(|e| AppError::Other(format!("Failed to create connection pool: {}", e)))?;

    log::debug!("Opened database pool at {}", db_path.display());

    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory().map_err(AppError::Database)?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(AppError::Database)?;

    Ok(conn)
}

/// Create an initialized pool on a throw-away file (for testing)
#[cfg(test)]
pub fn create_test_pool() -> (tempfile::TempDir, std::sync::Arc<ConnectionPool>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = create_connection_pool(&dir.path().join("test.db")).expect("pool");
    {
        let conn = get_connection(&pool).expect("connection");
        crate::db::initialize_database(&conn).expect("schema");
    }
    (dir, std::sync::Arc::new(pool))
}
