use std::collections::{HashMap, HashSet};

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing frames to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// A registered WebSocket connection and the broadcast groups it joined.
struct Connection {
    sender: WsSender,
    groups: HashSet<String>,
}

/// Registry of live WebSocket connections and named broadcast groups.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` inside `AppState`.
/// Publishing snapshots the subscriber senders before sending, so a
/// connection joining or leaving mid-publish cannot disturb iteration.
/// Delivery is fire-and-forget: each connection drains its own unbounded
/// channel, and a slow or dead subscriber never blocks the publisher.
#[derive(Default)]
pub struct BroadcastHub {
    connections: RwLock<HashMap<String, Connection>>,
}

impl BroadcastHub {
    /// Create a new, empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward frames to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection {
            sender: tx,
            groups: HashSet::new(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection and all its group memberships.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Subscribe a connection to a named group. Unknown connection ids
    /// are ignored.
    pub async fn subscribe(&self, conn_id: &str, group: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.groups.insert(group.to_string());
        }
    }

    /// Drop a connection's membership in a named group.
    pub async fn unsubscribe(&self, conn_id: &str, group: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.groups.remove(group);
        }
    }

    /// Send a frame to every member of `group`.
    ///
    /// Connections whose send channels are closed are silently skipped
    /// (they get cleaned up when their socket task exits). Returns the
    /// number of subscribers the frame was handed to.
    pub async fn publish(&self, group: &str, message: Message) -> usize {
        let senders: Vec<WsSender> = {
            let conns = self.connections.read().await;
            conns
                .values()
                .filter(|conn| conn.groups.contains(group))
                .map(|conn| conn.sender.clone())
                .collect()
        };

        let mut delivered = 0;
        for tx in &senders {
            if tx.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Send a frame to every connection regardless of group membership.
    pub async fn broadcast(&self, message: Message) {
        let senders: Vec<WsSender> = {
            let conns = self.connections.read().await;
            conns.values().map(|conn| conn.sender.clone()).collect()
        };

        for tx in &senders {
            let _ = tx.send(message.clone());
        }
    }

    /// Current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Vec::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Message {
        Message::Text(s.to_string())
    }

    #[tokio::test]
    async fn publish_reaches_only_group_members() {
        let hub = BroadcastHub::new();
        let mut dash_rx = hub.add("dash".to_string()).await;
        let mut other_rx = hub.add("other".to_string()).await;
        hub.subscribe("dash", "dashboard").await;

        let delivered = hub.publish("dashboard", text("hello")).await;

        assert_eq!(delivered, 1);
        assert_eq!(dash_rx.recv().await, Some(text("hello")));
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let hub = BroadcastHub::new();
        let mut rx_a = hub.add("a".to_string()).await;
        let mut rx_b = hub.add("b".to_string()).await;

        hub.broadcast(text("all")).await;

        assert_eq!(rx_a.recv().await, Some(text("all")));
        assert_eq!(rx_b.recv().await, Some(text("all")));
    }

    #[tokio::test]
    async fn removed_connection_receives_nothing() {
        let hub = BroadcastHub::new();
        let mut rx = hub.add("a".to_string()).await;
        hub.subscribe("a", "dashboard").await;
        hub.remove("a").await;

        let delivered = hub.publish("dashboard", text("late")).await;

        assert_eq!(delivered, 0);
        assert_eq!(hub.connection_count().await, 0);
        // Channel is closed once the hub drops its sender.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn publish_skips_dropped_receivers() {
        let hub = BroadcastHub::new();
        let rx = hub.add("dead".to_string()).await;
        hub.subscribe("dead", "dashboard").await;
        drop(rx);

        let delivered = hub.publish("dashboard", text("x")).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let hub = BroadcastHub::new();
        let mut rx = hub.add("a".to_string()).await;
        hub.subscribe("a", "dashboard").await;
        hub.unsubscribe("a", "dashboard").await;

        let delivered = hub.publish("dashboard", text("x")).await;

        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }
}
