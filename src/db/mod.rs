pub mod locations;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Create a SQLite connection pool
///
/// The database file is created on first run. The acquire timeout bounds
/// how long any handler can wait on storage.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Opening database: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create both append-only location logs if they do not exist yet.
///
/// The two tables share one shape on purpose: every sample is written to
/// both, and nothing in this server ever updates or deletes a row.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            latitude REAL,
            longitude REAL,
            timestamp TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS location_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            latitude REAL,
            longitude REAL,
            timestamp TEXT
        )",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema ready");

    Ok(())
}
