use std::collections::HashMap;
use std::sync::Mutex;

/// Process-wide record of which users are currently online.
///
/// Absent keys mean offline. Entries are created on join, flipped to
/// false on leave, and never removed. State lives in memory only and
/// resets on restart.
///
/// A dropped connection does NOT flip its user offline; only an explicit
/// leave does. Mutations are serialized by the internal mutex so
/// concurrent join/leave for the same user cannot lose updates.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    online: Mutex<HashMap<String, bool>>,
}

impl PresenceRegistry {
    /// Create an empty registry (everyone offline).
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user online. Idempotent.
    pub fn set_online(&self, user_id: &str) {
        self.online
            .lock()
            .unwrap()
            .insert(user_id.to_string(), true);
    }

    /// Mark a user offline. Works even if the user never joined.
    pub fn set_offline(&self, user_id: &str) {
        self.online
            .lock()
            .unwrap()
            .insert(user_id.to_string(), false);
    }

    /// Whether a user is currently online. Unknown users are offline.
    pub fn is_online(&self, user_id: &str) -> bool {
        self.online
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(false)
    }

    /// Snapshot of every user that ever joined and their current flag.
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.online.lock().unwrap().clone()
    }
}
