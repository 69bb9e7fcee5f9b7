//! PostgreSQL implementation of the order store.
//!
//! Status transitions run inside a transaction with `SELECT ... FOR
//! UPDATE`, so two concurrent updates for the same order serialize at the
//! row level even across gateway processes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::OrderStore;
use super::models::{decode_order, encode_order};
use crate::domain::{Order, OrderId, OrderStatus, PaymentStatus, RestaurantId};
use crate::error::GatewayError;

/// PostgreSQL-backed order store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> GatewayError {
    GatewayError::Persistence(e.to_string())
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create_order(&self, order: Order) -> Result<Order, GatewayError> {
        let doc = encode_order(&order)?;
        sqlx::query(
            "INSERT INTO orders (id, restaurant_id, status, payment_status, doc, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*order.id.as_uuid())
        .bind(*order.restaurant_id.as_uuid())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&doc)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(order)
    }

    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT doc FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(*order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some((doc,)) = row else {
            return Err(GatewayError::OrderNotFound(order_id));
        };
        let mut order = decode_order(doc)?;

        if !order.status.can_transition_to(status) {
            return Err(GatewayError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        order.updated_at = Utc::now();

        let doc = encode_order(&order)?;
        sqlx::query("UPDATE orders SET status = $1, doc = $2, updated_at = $3 WHERE id = $4")
            .bind(order.status.as_str())
            .bind(&doc)
            .bind(order.updated_at)
            .bind(*order_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(order)
    }

    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT doc FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(*order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some((doc,)) = row else {
            return Err(GatewayError::OrderNotFound(order_id));
        };
        let mut order = decode_order(doc)?;
        order.payment_status = payment_status;
        order.updated_at = Utc::now();

        let doc = encode_order(&order)?;
        sqlx::query(
            "UPDATE orders SET payment_status = $1, doc = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(order.payment_status.as_str())
        .bind(&doc)
        .bind(order.updated_at)
        .bind(*order_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Order, GatewayError> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>("SELECT doc FROM orders WHERE id = $1")
            .bind(*order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        let Some((doc,)) = row else {
            return Err(GatewayError::OrderNotFound(order_id));
        };
        decode_order(doc)
    }

    async fn open_orders(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, GatewayError> {
        let rows = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT doc FROM orders \
             WHERE restaurant_id = $1 AND status NOT IN ('DELIVERED', 'CANCELLED') \
             ORDER BY created_at ASC",
        )
        .bind(*restaurant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|(doc,)| decode_order(doc)).collect()
    }
}
