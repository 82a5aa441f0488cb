use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use crate::constants::DASHBOARD_GROUP;
use crate::db;
use crate::models::LocationSample;
use crate::ws::events::{ClientEvent, ServerEvent};
use crate::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the hub.
///   2. Spawns a sender task that forwards hub frames to the sink.
///   3. Dispatches inbound frames on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = state.hub.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward hub frames to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: dispatch inbound frames.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => handle_event(&state, &conn_id, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // A dropped connection does not mark its user offline; only an
    // explicit leave event does.
    state.hub.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Dispatch a single inbound text frame.
///
/// Malformed or unrecognized frames are ignored (logged at debug level)
/// rather than tearing down the connection.
pub async fn handle_event(state: &AppState, conn_id: &str, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed frame");
            return;
        }
    };

    match event {
        ClientEvent::Join { user_id } => {
            // Joining subscribes the connection to the group named after
            // the user id; dashboards join as "dashboard" to receive the
            // location fan-out.
            state.hub.subscribe(conn_id, &user_id).await;
            state.presence.set_online(&user_id);
            tracing::info!(user_id = %user_id, "User joined");

            let status = ServerEvent::UserStatus {
                user_id,
                online: true,
            };
            state.hub.broadcast(status.to_message()).await;
        }
        ClientEvent::Leave { user_id } => {
            state.presence.set_offline(&user_id);
            tracing::info!(user_id = %user_id, "User left");

            let status = ServerEvent::UserStatus {
                user_id,
                online: false,
            };
            state.hub.broadcast(status.to_message()).await;
        }
        ClientEvent::LocationUpdate {
            user_id,
            latitude,
            longitude,
        } => {
            let sample = LocationSample::stamped_now(user_id, latitude, longitude);

            // Fire-and-forget: a storage failure is logged, never
            // surfaced to the sender, and the dashboard broadcast still
            // goes out.
            if let Err(e) = db::locations::insert_sample(&state.pool, &sample).await {
                tracing::error!(
                    user_id = %sample.user_id,
                    error = %e,
                    "Failed to persist streamed location"
                );
            }

            let update = ServerEvent::LocationUpdate {
                user_id: sample.user_id,
                latitude: sample.latitude,
                longitude: sample.longitude,
                timestamp: sample.timestamp,
            };
            state.hub.publish(DASHBOARD_GROUP, update.to_message()).await;
        }
    }
}
