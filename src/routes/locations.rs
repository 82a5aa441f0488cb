use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::HISTORY_LIMIT;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{LocationSample, UserLocations};
use crate::AppState;

/// Request body for `POST /store_location`.
///
/// All fields are optional at the serde level so a missing field can be
/// reported through the structured error envelope instead of a generic
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct StoreLocationRequest {
    pub user_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
}

impl StoreLocationRequest {
    /// Reject the request unless all four fields are present.
    fn into_sample(self) -> Result<LocationSample> {
        Ok(LocationSample {
            user_id: self.user_id.ok_or(AppError::MissingField("user_id"))?,
            latitude: self.latitude.ok_or(AppError::MissingField("latitude"))?,
            longitude: self.longitude.ok_or(AppError::MissingField("longitude"))?,
            timestamp: self.timestamp.ok_or(AppError::MissingField("timestamp"))?,
        })
    }
}

/// Store a client-stamped location sample.
///
/// Appends the sample to both logs in a single transaction; the client
/// timestamp is stored verbatim. Nothing is broadcast on this path: only
/// the streaming channel fans out to dashboards.
pub async fn store_location(
    State(state): State<AppState>,
    Json(payload): Json<StoreLocationRequest>,
) -> Result<Json<Value>> {
    let sample = payload.into_sample()?;

    if sample.user_id.is_empty() {
        return Err(AppError::InvalidInput(
            "user_id must not be empty".to_string(),
        ));
    }

    db::locations::insert_sample(&state.pool, &sample).await?;

    tracing::info!(user_id = %sample.user_id, "Stored location");

    Ok(Json(json!({
        "status": "success",
        "message": "Location stored",
    })))
}

/// List every user ever seen, with their latest fix and recent trail.
///
/// One entry per distinct user id in the primary log; history comes from
/// the history log, most recent first, capped at [`HISTORY_LIMIT`]. The
/// order of users themselves carries no meaning.
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut users = Vec::new();

    for user_id in db::locations::distinct_user_ids(&state.pool).await? {
        let latest = db::locations::latest_fix(&state.pool, &user_id).await?;
        let history = db::locations::recent_history(&state.pool, &user_id, HISTORY_LIMIT).await?;

        users.push(UserLocations {
            user_id,
            latitude: latest.as_ref().map(|fix| fix.latitude),
            longitude: latest.as_ref().map(|fix| fix.longitude),
            timestamp: latest.map(|fix| fix.timestamp),
            history,
        });
    }

    Ok(Json(json!({
        "status": "success",
        "users": users,
    })))
}
