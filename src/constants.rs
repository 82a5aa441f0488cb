/// Broadcast group that receives live location fan-out.
///
/// Dashboard clients subscribe by sending `join {user_id: "dashboard"}`
/// over the real-time channel.
pub const DASHBOARD_GROUP: &str = "dashboard";

/// Maximum number of trail entries returned per user by `get_users`.
pub const HISTORY_LIMIT: i64 = 10;

/// Name of the session cookie issued by `/login`.
pub const SESSION_COOKIE: &str = "session";

/// Session lifetime in seconds (12 hours).
pub const SESSION_TTL_SECS: i64 = 43_200;
