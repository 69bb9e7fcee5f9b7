//! WebSocket message types: envelope, client commands, and builders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewOrder, Notification, OrderId, RestaurantId};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// Outbound event name (e.g. `"order_received"`). Absent on inbound
    /// commands and command responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Wraps a notification for delivery to a client.
    #[must_use]
    pub fn event(note: &Notification) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            event: Some(note.channel().to_string()),
            timestamp: Utc::now(),
            payload: serde_json::to_value(note).unwrap_or_default(),
        }
    }

    /// Builds a success response to a client command.
    #[must_use]
    pub fn response(request_id: String, payload: serde_json::Value) -> Self {
        Self {
            id: request_id,
            msg_type: WsMessageType::Response,
            event: None,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message, unicast to the originating connection.
    #[must_use]
    pub fn error(request_id: String, code: u32, message: &str) -> Self {
        Self {
            id: request_id,
            msg_type: WsMessageType::Error,
            event: Some("order_error".to_string()),
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "message": message,
            }),
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands a client can send over WebSocket.
///
/// Status fields arrive as raw strings and are validated by the
/// dispatcher, so an unknown status produces a unicast validation error
/// rather than an envelope parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Join the kitchen room for a restaurant.
    JoinKitchen {
        /// Restaurant to join.
        restaurant_id: RestaurantId,
    },
    /// Join the waiter room for a restaurant.
    JoinWaiter {
        /// Restaurant to join.
        restaurant_id: RestaurantId,
    },
    /// Place a new order.
    NewOrder {
        /// Order payload.
        order: NewOrder,
    },
    /// Move an order to a new lifecycle status.
    UpdateOrderStatus {
        /// Target order.
        order_id: OrderId,
        /// New status as a wire string (e.g. `"PREPARING"`).
        status: String,
        /// Restaurant the order belongs to.
        restaurant_id: RestaurantId,
    },
    /// Update an order's payment status.
    UpdatePaymentStatus {
        /// Target order.
        order_id: OrderId,
        /// New payment status as a wire string (e.g. `"PAID"`).
        payment_status: String,
        /// Restaurant the order belongs to.
        restaurant_id: RestaurantId,
    },
    /// Flag an order as ready for pickup (informational).
    KitchenReady {
        /// Target order.
        order_id: OrderId,
        /// Restaurant the order belongs to.
        restaurant_id: RestaurantId,
    },
    /// Report a rider collecting an order (informational).
    DeliveryPickup {
        /// Target order.
        order_id: OrderId,
        /// Restaurant the order belongs to.
        restaurant_id: RestaurantId,
        /// Rider who collected the order.
        rider_id: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn command_parses_from_tagged_payload() {
        let restaurant_id = RestaurantId::new();
        let payload = serde_json::json!({
            "command": "join_kitchen",
            "restaurant_id": restaurant_id,
        });
        let Ok(cmd) = serde_json::from_value::<ClientCommand>(payload) else {
            panic!("parse failed");
        };
        assert!(matches!(
            cmd,
            ClientCommand::JoinKitchen { restaurant_id: r } if r == restaurant_id
        ));
    }

    #[test]
    fn status_update_keeps_status_as_string() {
        let payload = serde_json::json!({
            "command": "update_order_status",
            "order_id": OrderId::new(),
            "status": "NOT_A_STATUS",
            "restaurant_id": RestaurantId::new(),
        });
        // Parsing succeeds; the dispatcher rejects the bogus status later.
        assert!(serde_json::from_value::<ClientCommand>(payload).is_ok());
    }

    #[test]
    fn error_envelope_carries_code_and_channel() {
        let msg = WsMessage::error("req-1".to_string(), 1001, "bad payload");
        assert_eq!(msg.msg_type, WsMessageType::Error);
        assert_eq!(msg.event.as_deref(), Some("order_error"));
        assert_eq!(msg.payload.get("code").and_then(|c| c.as_u64()), Some(1001));
    }
}
