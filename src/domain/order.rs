//! Order entity and its lifecycle vocabulary.
//!
//! The gateway does not own order storage — persistence lives behind the
//! [`crate::persistence::OrderStore`] seam — but it owns the lifecycle
//! rules: which status transitions are legal, which statuses count as
//! "open" for backfill, and how monetary totals are derived from line
//! items. All money is integer cents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{OrderId, RestaurantId};
use crate::error::GatewayError;

/// Order lifecycle status.
///
/// Legal forward path: `PENDING → CONFIRMED → PREPARING → READY →
/// DELIVERED`. `CANCELLED` is reachable from any non-terminal state and is
/// terminal, as is `DELIVERED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, not yet acknowledged by staff.
    Pending,
    /// Acknowledged by staff.
    Confirmed,
    /// Kitchen is working on it.
    Preparing,
    /// Ready for pickup / serving.
    Ready,
    /// Handed to the customer (or served at the table).
    Delivered,
    /// Cancelled before completion.
    Cancelled,
}

impl OrderStatus {
    /// Returns `true` if the order can move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed)
            | (Self::Confirmed, Self::Preparing)
            | (Self::Preparing, Self::Ready)
            | (Self::Ready, Self::Delivered) => true,
            (
                Self::Pending | Self::Confirmed | Self::Preparing | Self::Ready,
                Self::Cancelled,
            ) => true,
            _ => false,
        }
    }

    /// Returns `true` for terminal states (no further transitions).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Returns the wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "DELIVERED" | "SERVED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(GatewayError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Payment settlement status, updated by the payment-gateway webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Payment captured.
    Paid,
    /// Payment attempt failed.
    Failed,
    /// Payment refunded after capture.
    Refunded,
}

impl PaymentStatus {
    /// Returns the wire string for this payment status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            other => Err(GatewayError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Table service inside the restaurant.
    DineIn,
    /// Customer collects at the counter.
    Takeaway,
    /// Rider delivers to an address.
    Delivery,
}

/// Payment instrument chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery / at the counter.
    Cash,
    /// Card via Stripe.
    Card,
    /// PayHere gateway.
    Payhere,
    /// LankaQR gateway.
    Lankaqr,
    /// Manual bank transfer.
    BankTransfer,
}

/// A single line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    /// Menu item reference (owned by the menu service).
    pub menu_item_id: uuid::Uuid,
    /// Number of units ordered.
    pub quantity: u32,
    /// Unit price in cents at order time.
    pub unit_price_cents: i64,
    /// Per-item preparation notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderItem {
    /// Returns the line total in cents.
    #[must_use]
    pub const fn line_total_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(self.quantity as i64)
    }
}

/// Validated input for creating an order, before an ID and totals exist.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewOrder {
    /// Restaurant the order belongs to.
    pub restaurant_id: RestaurantId,
    /// Table for dine-in orders placed via QR code.
    #[serde(default)]
    pub table_id: Option<uuid::Uuid>,
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact phone.
    pub customer_phone: String,
    /// Optional contact email.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Line items; must be non-empty.
    pub items: Vec<OrderItem>,
    /// Dine-in, takeaway, or delivery.
    pub order_type: OrderType,
    /// Chosen payment instrument.
    pub payment_method: PaymentMethod,
    /// Delivery address for delivery orders.
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// Delivery fee in cents; defaults to zero.
    #[serde(default)]
    pub delivery_fee_cents: i64,
    /// Order-level preparation notes.
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// A persisted order as returned by the store and carried on events.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Restaurant the order belongs to.
    pub restaurant_id: RestaurantId,
    /// Table for dine-in orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<uuid::Uuid>,
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact phone.
    pub customer_phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// Dine-in, takeaway, or delivery.
    pub order_type: OrderType,
    /// Chosen payment instrument.
    pub payment_method: PaymentMethod,
    /// Delivery address for delivery orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Delivery fee in cents.
    pub delivery_fee_cents: i64,
    /// Sum of line totals in cents.
    pub subtotal_cents: i64,
    /// Subtotal plus delivery fee in cents.
    pub total_cents: i64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Payment settlement status.
    pub payment_status: PaymentStatus,
    /// Order-level preparation notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a fresh `PENDING` order from validated input, computing
    /// totals server-side.
    #[must_use]
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        let now = Utc::now();
        let subtotal_cents: i64 = new
            .items
            .iter()
            .map(OrderItem::line_total_cents)
            .fold(0, i64::saturating_add);
        let total_cents = subtotal_cents.saturating_add(new.delivery_fee_cents);
        Self {
            id,
            restaurant_id: new.restaurant_id,
            table_id: new.table_id,
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            customer_email: new.customer_email,
            items: new.items,
            order_type: new.order_type,
            payment_method: new.payment_method,
            delivery_address: new.delivery_address,
            delivery_fee_cents: new.delivery_fee_cents,
            subtotal_cents,
            total_cents,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_instructions: new.special_instructions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if the order still needs staff attention
    /// (neither delivered nor cancelled). Open orders are what backfill
    /// pushes to (re)joining clients.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}
