//! Server→client notification payloads.
//!
//! These are the concrete messages delivered to room members (or, for
//! [`Notification::OpenOrders`], unicast to the joining connection). The
//! WebSocket layer wraps them in its message envelope; the registry
//! transports them over per-connection channels. Error replies are not
//! notifications — they travel as error envelopes to the originator only.

use serde::Serialize;

use super::ids::OrderId;
use super::order::Order;

/// Outbound notification payload.
///
/// The serde tag mirrors the legacy wire contract (`NEW_ORDER`,
/// `STATUS_UPDATE`, ...); [`Notification::channel`] supplies the event
/// name the envelope carries alongside it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    /// A new order arrived.
    NewOrder {
        /// The order as persisted.
        order: Order,
    },
    /// An order's lifecycle status changed.
    StatusUpdate {
        /// The order after the transition.
        order: Order,
    },
    /// An order's payment status changed.
    PaymentUpdate {
        /// The order after the update.
        order: Order,
    },
    /// Supplementary "ready for pickup" notice for waiter stations.
    OrderReady {
        /// Order the notice refers to.
        order_id: OrderId,
        /// Display message.
        message: String,
    },
    /// Supplementary rider-pickup notice for the kitchen.
    #[serde(rename = "DELIVERY_PICKUP")]
    RiderPickup {
        /// Order the notice refers to.
        order_id: OrderId,
        /// Rider who collected the order.
        rider_id: String,
        /// Display message.
        message: String,
    },
    /// Backfill snapshot of open orders, unicast on (re)join.
    OpenOrders {
        /// Currently open orders for the joined restaurant.
        orders: Vec<Order>,
    },
}

impl Notification {
    /// Returns the outbound event name carried in the envelope.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::NewOrder { .. } => "order_received",
            Self::StatusUpdate { .. } => "order_updated",
            Self::PaymentUpdate { .. } => "payment_updated",
            Self::OrderReady { .. } => "kitchen_notification",
            Self::RiderPickup { .. } => "delivery_notification",
            Self::OpenOrders { .. } => "open_orders",
        }
    }
}
