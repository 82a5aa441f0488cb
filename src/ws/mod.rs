//! Real-time channel: connection hub, wire events, and the HTTP upgrade
//! handler used by the Axum router.

pub mod events;
pub mod hub;

mod handler;
mod heartbeat;

pub use handler::{handle_event, ws_handler};
pub use heartbeat::start_heartbeat;
pub use hub::BroadcastHub;
