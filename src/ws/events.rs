use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};

/// Frames clients send over the real-time channel.
///
/// Wire format is a JSON text frame: `{"event": <name>, "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join {
        user_id: String,
    },
    Leave {
        user_id: String,
    },
    LocationUpdate {
        user_id: String,
        latitude: f64,
        longitude: f64,
    },
}

/// Frames the server pushes to clients, same envelope as [`ClientEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UserStatus {
        user_id: String,
        online: bool,
    },
    LocationUpdate {
        user_id: String,
        latitude: f64,
        longitude: f64,
        timestamp: String,
    },
}

impl ServerEvent {
    /// Encode as a WebSocket text frame.
    pub fn to_message(&self) -> Message {
        // Serializing these enums cannot fail; fall back to an empty
        // frame rather than panicking if it somehow does.
        Message::Text(serde_json::to_string(self).unwrap_or_default())
    }
}
