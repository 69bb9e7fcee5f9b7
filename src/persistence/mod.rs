//! Persistence layer: the external order store the dispatcher writes
//! through.
//!
//! [`OrderStore`] is the seam between the fan-out core and durable
//! storage. The production implementation is [`postgres::PostgresOrderStore`]
//! (`sqlx::PgPool`); [`memory::MemoryOrderStore`] backs tests and
//! persistence-disabled deployments. Both enforce the order lifecycle:
//! an illegal transition fails *before* the write, so the dispatcher
//! never broadcasts a state that was not actually saved.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Order, OrderId, OrderStatus, PaymentStatus, RestaurantId};
use crate::error::GatewayError;

pub use memory::MemoryOrderStore;
pub use postgres::PostgresOrderStore;

/// Durable storage for orders.
///
/// Every mutating method either commits and returns the updated entity or
/// fails without side effects — there is no partially-applied outcome for
/// the dispatcher to reason about.
#[async_trait]
pub trait OrderStore: std::fmt::Debug + Send + Sync {
    /// Persists a freshly built order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] if the write fails or an
    /// order with the same ID already exists.
    async fn create_order(&self, order: Order) -> Result<Order, GatewayError>;

    /// Transitions an order to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrderNotFound`] for unknown IDs,
    /// [`GatewayError::InvalidTransition`] when the move is illegal for
    /// the order's current status (including same-status no-ops), and
    /// [`GatewayError::Persistence`] on storage failure.
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, GatewayError>;

    /// Updates an order's payment status.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrderNotFound`] for unknown IDs and
    /// [`GatewayError::Persistence`] on storage failure.
    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order, GatewayError>;

    /// Fetches a single order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrderNotFound`] for unknown IDs and
    /// [`GatewayError::Persistence`] on storage failure.
    async fn get_order(&self, order_id: OrderId) -> Result<Order, GatewayError>;

    /// Returns all open (non-terminal) orders for a restaurant, oldest
    /// first. This is the backfill snapshot for (re)joining clients.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on storage failure.
    async fn open_orders(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, GatewayError>;
}
