//! Domain events for order lifecycle changes.
//!
//! An [`OrderEvent`] is transient: it exists only between a committed
//! state mutation and the end of fan-out. Its effect is observable solely
//! through the persisted order state and the [`super::Notification`]s
//! delivered to room members.

use super::Notification;
use super::ids::{OrderId, RestaurantId};
use super::order::Order;

/// A domain event emitted after (never before) the corresponding state
/// change was durably committed.
///
/// The first three variants carry the full updated [`Order`] because their
/// notifications do; the last two are purely informational and carry only
/// the fields their notifications need.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// A new order was created.
    OrderCreated {
        /// The order as persisted.
        order: Order,
    },
    /// An order moved to a new lifecycle status.
    OrderStatusChanged {
        /// The order after the transition.
        order: Order,
    },
    /// An order's payment status changed.
    PaymentStatusChanged {
        /// The order after the update.
        order: Order,
    },
    /// Kitchen flagged an order as ready for pickup. Informational; the
    /// state change itself travels as [`Self::OrderStatusChanged`].
    KitchenReady {
        /// Order the notice refers to.
        order_id: OrderId,
        /// Restaurant scoping the fan-out.
        restaurant_id: RestaurantId,
        /// Human-readable notice for waiter stations.
        message: String,
    },
    /// A delivery rider collected an order. Informational.
    DeliveryPickup {
        /// Order the notice refers to.
        order_id: OrderId,
        /// Restaurant scoping the fan-out.
        restaurant_id: RestaurantId,
        /// Rider who collected the order.
        rider_id: String,
        /// Human-readable notice for the kitchen.
        message: String,
    },
}

impl OrderEvent {
    /// Returns the order ID this event refers to.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::OrderCreated { order }
            | Self::OrderStatusChanged { order }
            | Self::PaymentStatusChanged { order } => order.id,
            Self::KitchenReady { order_id, .. } | Self::DeliveryPickup { order_id, .. } => {
                *order_id
            }
        }
    }

    /// Returns the restaurant whose rooms this event targets.
    #[must_use]
    pub fn restaurant_id(&self) -> RestaurantId {
        match self {
            Self::OrderCreated { order }
            | Self::OrderStatusChanged { order }
            | Self::PaymentStatusChanged { order } => order.restaurant_id,
            Self::KitchenReady { restaurant_id, .. }
            | Self::DeliveryPickup { restaurant_id, .. } => *restaurant_id,
        }
    }

    /// Returns the event type as a static string slice (log/metric label).
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "order_created",
            Self::OrderStatusChanged { .. } => "order_status_changed",
            Self::PaymentStatusChanged { .. } => "payment_status_changed",
            Self::KitchenReady { .. } => "kitchen_ready",
            Self::DeliveryPickup { .. } => "delivery_pickup",
        }
    }

    /// Builds the outbound notification room members receive for this
    /// event.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::OrderCreated { order } => Notification::NewOrder {
                order: order.clone(),
            },
            Self::OrderStatusChanged { order } => Notification::StatusUpdate {
                order: order.clone(),
            },
            Self::PaymentStatusChanged { order } => Notification::PaymentUpdate {
                order: order.clone(),
            },
            Self::KitchenReady {
                order_id, message, ..
            } => Notification::OrderReady {
                order_id: *order_id,
                message: message.clone(),
            },
            Self::DeliveryPickup {
                order_id,
                rider_id,
                message,
                ..
            } => Notification::RiderPickup {
                order_id: *order_id,
                rider_id: rider_id.clone(),
                message: message.clone(),
            },
        }
    }
}
