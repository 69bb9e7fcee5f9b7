//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! inbound client commands are translated into dispatcher calls, and
//! notifications arriving on the connection's channel are forwarded to
//! the socket. Command failures are reported to this connection only —
//! they are never broadcast.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ClientCommand, WsMessage};
use crate::app_state::AppState;
use crate::domain::{ConnectionId, Notification, NotificationSender, RestaurantId, StaffRole};
use crate::error::GatewayError;

/// Runs the read/write loop for a single WebSocket connection.
///
/// The connection is registered before the loop starts and unregistered
/// when it exits, whatever the exit reason — a transport close is
/// cooperative cancellation and must leave no room memberships behind.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    let (note_tx, mut note_rx) = mpsc::unbounded_channel::<Notification>();
    state.registry.register(connection_id, note_tx.clone()).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming command from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply =
                            handle_text_message(&text, connection_id, &state, &note_tx).await;
                        if let Some(reply_json) = reply
                            && ws_tx.send(Message::text(reply_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Notification fanned out to one of this connection's rooms
            note = note_rx.recv() => {
                match note {
                    Some(note) => {
                        let msg = WsMessage::event(&note);
                        let json = serde_json::to_string(&msg).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    state.registry.unregister(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Handles a text frame from the client, returning an optional JSON
/// reply for the originating connection.
pub(crate) async fn handle_text_message(
    text: &str,
    connection_id: ConnectionId,
    state: &AppState,
    self_tx: &NotificationSender,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage::error(String::new(), 1001, "malformed JSON envelope");
        return serde_json::to_string(&err).ok();
    };

    let command = match serde_json::from_value::<ClientCommand>(msg.payload.clone()) {
        Ok(command) => command,
        Err(e) => {
            let err = WsMessage::error(msg.id, 1001, &format!("unknown or malformed command: {e}"));
            return serde_json::to_string(&err).ok();
        }
    };

    let reply = match handle_command(command, connection_id, state, self_tx).await {
        Ok(payload) => WsMessage::response(msg.id, payload),
        Err(e) => WsMessage::error(msg.id, e.error_code(), &e.to_string()),
    };
    serde_json::to_string(&reply).ok()
}

/// Translates one client command into registry/dispatcher calls.
async fn handle_command(
    command: ClientCommand,
    connection_id: ConnectionId,
    state: &AppState,
    self_tx: &NotificationSender,
) -> Result<serde_json::Value, GatewayError> {
    match command {
        ClientCommand::JoinKitchen { restaurant_id } => {
            join(connection_id, restaurant_id, StaffRole::Kitchen, state, self_tx).await
        }
        ClientCommand::JoinWaiter { restaurant_id } => {
            join(connection_id, restaurant_id, StaffRole::Waiter, state, self_tx).await
        }
        ClientCommand::NewOrder { order } => {
            let order = state.dispatcher.create_order(order).await?;
            Ok(serde_json::json!({ "order": order }))
        }
        ClientCommand::UpdateOrderStatus {
            order_id,
            status,
            restaurant_id,
        } => {
            let status = status.parse()?;
            let order = state
                .dispatcher
                .update_order_status(order_id, status, restaurant_id)
                .await?;
            Ok(serde_json::json!({ "order": order }))
        }
        ClientCommand::UpdatePaymentStatus {
            order_id,
            payment_status,
            restaurant_id,
        } => {
            let payment_status = payment_status.parse()?;
            let order = state
                .dispatcher
                .update_payment_status(order_id, payment_status, restaurant_id)
                .await?;
            Ok(serde_json::json!({ "order": order }))
        }
        ClientCommand::KitchenReady {
            order_id,
            restaurant_id,
        } => {
            state
                .dispatcher
                .notify_kitchen_ready(order_id, restaurant_id)
                .await?;
            Ok(serde_json::json!({ "acknowledged": true }))
        }
        ClientCommand::DeliveryPickup {
            order_id,
            restaurant_id,
            rider_id,
        } => {
            state
                .dispatcher
                .notify_delivery_pickup(order_id, restaurant_id, &rider_id)
                .await?;
            Ok(serde_json::json!({ "acknowledged": true }))
        }
    }
}

async fn join(
    connection_id: ConnectionId,
    restaurant_id: RestaurantId,
    role: StaffRole,
    state: &AppState,
    self_tx: &NotificationSender,
) -> Result<serde_json::Value, GatewayError> {
    if restaurant_id.is_nil() {
        return Err(GatewayError::Validation(
            "restaurant_id must not be empty".to_string(),
        ));
    }
    state.registry.join(connection_id, restaurant_id, role).await;

    // Join before fetching the snapshot: anything committed after the
    // snapshot arrives as a live event, so the client converges even if
    // the snapshot duplicates an event it already saw.
    let mut backfilled = 0usize;
    if state.backfill_enabled {
        match state.dispatcher.open_orders(restaurant_id).await {
            Ok(orders) => {
                backfilled = orders.len();
                let _ = self_tx.send(Notification::OpenOrders { orders });
            }
            Err(e) => {
                tracing::warn!(%restaurant_id, error = %e, "backfill fetch failed");
            }
        }
    }

    Ok(serde_json::json!({
        "joined": format!("{role}-{restaurant_id}"),
        "open_orders": backfilled,
    }))
}
