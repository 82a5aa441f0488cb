use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single location sample as submitted by a client.
///
/// Coordinates are stored as received: no range validation is performed,
/// and the user id is opaque beyond being non-empty. The timestamp is an
/// ISO-8601 string, either client-supplied (HTTP path) or server-stamped
/// (streaming path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSample {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

impl LocationSample {
    /// Build a sample stamped with the current UTC time.
    pub fn stamped_now(user_id: String, latitude: f64, longitude: f64) -> Self {
        Self {
            user_id,
            latitude,
            longitude,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// One entry of a user's location trail.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// Per-user entry returned by `get_users`.
///
/// The top-level fields are null when the user has no rows in the primary
/// log; ids produced by a DISTINCT scan of that log always have at least
/// one, but the shape allows for zero.
#[derive(Debug, Clone, Serialize)]
pub struct UserLocations {
    pub user_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
    pub history: Vec<LocationFix>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn stamped_now_produces_valid_rfc3339() {
        let before = Utc::now();
        let sample = LocationSample::stamped_now("u".to_string(), 1.0, 2.0);
        let parsed = DateTime::parse_from_rfc3339(&sample.timestamp).unwrap();

        assert!(parsed.with_timezone(&Utc) >= before);
        assert_eq!(sample.user_id, "u");
    }

    #[test]
    fn user_locations_serializes_nulls_for_empty_user() {
        let entry = UserLocations {
            user_id: "u".to_string(),
            latitude: None,
            longitude: None,
            timestamp: None,
            history: Vec::new(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["latitude"].is_null());
        assert!(value["timestamp"].is_null());
        assert_eq!(value["history"], serde_json::json!([]));
    }
}
