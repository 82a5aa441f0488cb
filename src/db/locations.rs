use sqlx::SqlitePool;

use crate::models::{LocationFix, LocationSample};

/// Append a sample to both location logs.
///
/// Both inserts run inside a single transaction so a crash between them
/// can never leave the logs inconsistent: either both rows land or
/// neither does.
pub async fn insert_sample(pool: &SqlitePool, sample: &LocationSample) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO locations (user_id, latitude, longitude, timestamp) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&sample.user_id)
    .bind(sample.latitude)
    .bind(sample.longitude)
    .bind(&sample.timestamp)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO location_history (user_id, latitude, longitude, timestamp) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&sample.user_id)
    .bind(sample.latitude)
    .bind(sample.longitude)
    .bind(&sample.timestamp)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Every user ever seen in the primary log, in scan order.
pub async fn distinct_user_ids(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT user_id FROM locations")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
}

/// Most recent fix for a user from the primary log.
///
/// Equal timestamps are broken by insertion order (highest row id wins)
/// so the result is deterministic.
pub async fn latest_fix(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<LocationFix>, sqlx::Error> {
    sqlx::query_as(
        "SELECT latitude, longitude, timestamp FROM locations
         WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Up to `limit` most recent fixes for a user from the history log,
/// most recent first.
pub async fn recent_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<LocationFix>, sqlx::Error> {
    sqlx::query_as(
        "SELECT latitude, longitude, timestamp FROM location_history
         WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT ?2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        // One connection: every pooled connection to :memory: would
        // otherwise get its own empty database.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn sample(user_id: &str, lat: f64, lon: f64, ts: &str) -> LocationSample {
        LocationSample {
            user_id: user_id.to_string(),
            latitude: lat,
            longitude: lon,
            timestamp: ts.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_appends_to_both_logs() {
        let pool = test_pool().await;

        insert_sample(&pool, &sample("a", 1.0, 2.0, "2024-01-01T00:00:00"))
            .await
            .unwrap();

        let (primary,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations")
            .fetch_one(&pool)
            .await
            .unwrap();
        let (history,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM location_history")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(primary, 1);
        assert_eq!(history, 1);
    }

    #[tokio::test]
    async fn latest_fix_prefers_newest_timestamp() {
        let pool = test_pool().await;

        insert_sample(&pool, &sample("a", 1.0, 1.0, "2024-01-01T00:00:00"))
            .await
            .unwrap();
        insert_sample(&pool, &sample("a", 2.0, 2.0, "2024-01-02T00:00:00"))
            .await
            .unwrap();

        let fix = latest_fix(&pool, "a").await.unwrap().unwrap();
        assert_eq!(fix.latitude, 2.0);
        assert_eq!(fix.timestamp, "2024-01-02T00:00:00");
    }

    #[tokio::test]
    async fn latest_fix_breaks_timestamp_ties_by_insertion_order() {
        let pool = test_pool().await;

        insert_sample(&pool, &sample("a", 1.0, 1.0, "2024-01-01T00:00:00"))
            .await
            .unwrap();
        insert_sample(&pool, &sample("a", 2.0, 2.0, "2024-01-01T00:00:00"))
            .await
            .unwrap();

        let fix = latest_fix(&pool, "a").await.unwrap().unwrap();
        assert_eq!(fix.latitude, 2.0);
    }

    #[tokio::test]
    async fn latest_fix_for_unknown_user_is_none() {
        let pool = test_pool().await;
        assert!(latest_fix(&pool, "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_history_caps_at_limit_most_recent_first() {
        let pool = test_pool().await;

        for day in 1..=12 {
            insert_sample(
                &pool,
                &sample("a", day as f64, 0.0, &format!("2024-01-{day:02}T00:00:00")),
            )
            .await
            .unwrap();
        }

        let history = recent_history(&pool, "a", 10).await.unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].timestamp, "2024-01-12T00:00:00");
        assert_eq!(history[9].timestamp, "2024-01-03T00:00:00");
    }

    #[tokio::test]
    async fn distinct_user_ids_deduplicates() {
        let pool = test_pool().await;

        insert_sample(&pool, &sample("a", 1.0, 1.0, "2024-01-01T00:00:00"))
            .await
            .unwrap();
        insert_sample(&pool, &sample("a", 2.0, 2.0, "2024-01-02T00:00:00"))
            .await
            .unwrap();
        insert_sample(&pool, &sample("b", 3.0, 3.0, "2024-01-03T00:00:00"))
            .await
            .unwrap();

        let mut ids = distinct_user_ids(&pool).await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
