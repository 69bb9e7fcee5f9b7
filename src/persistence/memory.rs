//! In-memory implementation of the order store.
//!
//! Backs persistence-disabled deployments (demo mode) and tests. Applies
//! the same lifecycle rules as the PostgreSQL store so the dispatcher's
//! abort-before-broadcast contract can be exercised against either.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::OrderStore;
use crate::domain::{Order, OrderId, OrderStatus, PaymentStatus, RestaurantId};
use crate::error::GatewayError;

/// Order store keeping everything in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create_order(&self, order: Order) -> Result<Order, GatewayError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(GatewayError::Persistence(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, GatewayError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&order_id) else {
            return Err(GatewayError::OrderNotFound(order_id));
        };
        if !order.status.can_transition_to(status) {
            return Err(GatewayError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order, GatewayError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&order_id) else {
            return Err(GatewayError::OrderNotFound(order_id));
        };
        order.payment_status = payment_status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Order, GatewayError> {
        let orders = self.orders.read().await;
        orders
            .get(&order_id)
            .cloned()
            .ok_or(GatewayError::OrderNotFound(order_id))
    }

    async fn open_orders(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, GatewayError> {
        let orders = self.orders.read().await;
        let mut open: Vec<Order> = orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id && o.is_open())
            .cloned()
            .collect();
        open.sort_by_key(|o| o.created_at);
        Ok(open)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewOrder, OrderItem, OrderType, PaymentMethod};

    fn make_order(restaurant_id: RestaurantId) -> Order {
        Order::from_new(
            OrderId::new(),
            NewOrder {
                restaurant_id,
                table_id: None,
                customer_name: "Amara Jayasuriya".to_string(),
                customer_phone: "0754443332".to_string(),
                customer_email: None,
                items: vec![OrderItem {
                    menu_item_id: uuid::Uuid::new_v4(),
                    quantity: 1,
                    unit_price_cents: 2200,
                    special_instructions: None,
                }],
                order_type: OrderType::DineIn,
                payment_method: PaymentMethod::Cash,
                delivery_address: None,
                delivery_fee_cents: 0,
                special_instructions: None,
            },
        )
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryOrderStore::new();
        let order = make_order(RestaurantId::new());
        let id = order.id;

        let created = store.create_order(order).await;
        assert!(created.is_ok());

        let fetched = store.get_order(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let store = MemoryOrderStore::new();
        let order = make_order(RestaurantId::new());

        let _ = store.create_order(order.clone()).await;
        let second = store.create_order(order).await;
        assert!(matches!(second, Err(GatewayError::Persistence(_))));
    }

    #[tokio::test]
    async fn legal_transition_updates_row() {
        let store = MemoryOrderStore::new();
        let order = make_order(RestaurantId::new());
        let id = order.id;
        let _ = store.create_order(order).await;

        let updated = store.update_order_status(id, OrderStatus::Confirmed).await;
        let Ok(updated) = updated else {
            panic!("transition should succeed");
        };
        assert_eq!(updated.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected_without_write() {
        let store = MemoryOrderStore::new();
        let order = make_order(RestaurantId::new());
        let id = order.id;
        let _ = store.create_order(order).await;

        let result = store.update_order_status(id, OrderStatus::Ready).await;
        assert!(matches!(
            result,
            Err(GatewayError::InvalidTransition { .. })
        ));

        let Ok(unchanged) = store.get_order(id).await else {
            panic!("order must still exist");
        };
        assert_eq!(unchanged.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn same_status_noop_is_rejected() {
        let store = MemoryOrderStore::new();
        let order = make_order(RestaurantId::new());
        let id = order.id;
        let _ = store.create_order(order).await;

        let result = store.update_order_status(id, OrderStatus::Pending).await;
        assert!(matches!(
            result,
            Err(GatewayError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let store = MemoryOrderStore::new();
        let result = store
            .update_order_status(OrderId::new(), OrderStatus::Confirmed)
            .await;
        assert!(matches!(result, Err(GatewayError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn open_orders_filters_restaurant_and_terminal_states() {
        let store = MemoryOrderStore::new();
        let restaurant = RestaurantId::new();

        let open = make_order(restaurant);
        let open_id = open.id;
        let _ = store.create_order(open).await;

        let mut cancelled = make_order(restaurant);
        cancelled.status = OrderStatus::Cancelled;
        let _ = store.create_order(cancelled).await;

        let _ = store.create_order(make_order(RestaurantId::new())).await;

        let Ok(result) = store.open_orders(restaurant).await else {
            panic!("open_orders failed");
        };
        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(|o| o.id), Some(open_id));
    }
}
