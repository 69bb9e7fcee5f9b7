//! Event dispatcher: the persist-then-broadcast orchestration point.
//!
//! Every order mutation flows through [`OrderDispatcher`], which enforces
//! the core contract: validate the payload, commit the change through the
//! [`OrderStore`], and only then fan the event out to the rooms the
//! routing policy selects. A persistence failure aborts before any
//! broadcast, so consumers never observe a notification for state that
//! was not actually saved.
//!
//! Dispatches for the same order are serialized on a per-order mutex, so
//! back-to-back status updates commit and broadcast in order even when
//! issued from different connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    ConnectionRegistry, NewOrder, Order, OrderEvent, OrderId, OrderStatus, PaymentStatus,
    RestaurantId, routing,
};
use crate::error::GatewayError;
use crate::persistence::OrderStore;

/// Orchestration layer for all order mutations and notifications.
///
/// Stateless apart from the per-order lock table and a delivery-failure
/// counter; order state lives behind the store, connection state behind
/// the registry.
#[derive(Debug)]
pub struct OrderDispatcher {
    store: Arc<dyn OrderStore>,
    registry: Arc<ConnectionRegistry>,
    order_locks: Mutex<HashMap<OrderId, Arc<Mutex<()>>>>,
    delivery_failures: AtomicU64,
}

impl OrderDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            order_locks: Mutex::new(HashMap::new()),
            delivery_failures: AtomicU64::new(0),
        }
    }

    /// Returns the connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns the number of failed per-connection deliveries since start.
    #[must_use]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    /// Validates, persists, and broadcasts a new order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for malformed input and
    /// [`GatewayError::Persistence`] if the store rejects the write; in
    /// both cases nothing is broadcast.
    pub async fn create_order(&self, new: NewOrder) -> Result<Order, GatewayError> {
        validate_new_order(&new)?;

        let order_id = OrderId::new();
        let guard = self.acquire(order_id).await;

        let result = self.store.create_order(Order::from_new(order_id, new)).await;
        let order = match result {
            Ok(order) => order,
            Err(e) => {
                drop(guard);
                self.release(order_id).await;
                return Err(e);
            }
        };

        tracing::info!(
            %order_id,
            restaurant_id = %order.restaurant_id,
            total_cents = order.total_cents,
            "order created"
        );
        self.fan_out(&OrderEvent::OrderCreated {
            order: order.clone(),
        })
        .await;

        drop(guard);
        self.release(order_id).await;
        Ok(order)
    }

    /// Transitions an order's status and broadcasts the committed change.
    ///
    /// When the new status is `READY`, a supplementary pickup notice is
    /// additionally fanned out to the waiter room.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for nil IDs,
    /// [`GatewayError::OrderNotFound`] / [`GatewayError::InvalidTransition`]
    /// / [`GatewayError::Persistence`] from the store. On any error the
    /// broadcast is skipped entirely.
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        restaurant_id: RestaurantId,
    ) -> Result<Order, GatewayError> {
        validate_reference(order_id, restaurant_id)?;

        let guard = self.acquire(order_id).await;
        let result = self.store.update_order_status(order_id, status).await;
        let order = match result {
            Ok(order) => order,
            Err(e) => {
                drop(guard);
                self.release(order_id).await;
                return Err(e);
            }
        };

        tracing::info!(%order_id, status = %status, "order status updated");
        self.fan_out(&OrderEvent::OrderStatusChanged {
            order: order.clone(),
        })
        .await;

        if status == OrderStatus::Ready {
            self.fan_out(&OrderEvent::KitchenReady {
                order_id,
                restaurant_id: order.restaurant_id,
                message: format!("Order #{order_id} is ready for pickup"),
            })
            .await;
        }

        drop(guard);
        self.release(order_id).await;
        Ok(order)
    }

    /// Updates an order's payment status and broadcasts the committed
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for nil IDs and store errors
    /// as in [`Self::update_order_status`]; no broadcast on error.
    pub async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
        restaurant_id: RestaurantId,
    ) -> Result<Order, GatewayError> {
        validate_reference(order_id, restaurant_id)?;

        let guard = self.acquire(order_id).await;
        let result = self.store.update_payment_status(order_id, payment_status).await;
        let order = match result {
            Ok(order) => order,
            Err(e) => {
                drop(guard);
                self.release(order_id).await;
                return Err(e);
            }
        };

        tracing::info!(%order_id, payment_status = %payment_status, "payment status updated");
        self.fan_out(&OrderEvent::PaymentStatusChanged {
            order: order.clone(),
        })
        .await;

        drop(guard);
        self.release(order_id).await;
        Ok(order)
    }

    /// Fans out a supplementary "ready for pickup" notice to waiters.
    /// Informational: does not mutate persisted state, but still verifies
    /// the order exists so no notice is broadcast for a phantom order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for nil IDs or a restaurant
    /// mismatch, and [`GatewayError::OrderNotFound`] for unknown orders.
    pub async fn notify_kitchen_ready(
        &self,
        order_id: OrderId,
        restaurant_id: RestaurantId,
    ) -> Result<(), GatewayError> {
        validate_reference(order_id, restaurant_id)?;
        let order = self.store.get_order(order_id).await?;
        check_tenant(&order, restaurant_id)?;

        self.fan_out(&OrderEvent::KitchenReady {
            order_id,
            restaurant_id,
            message: format!("Order #{order_id} is ready for pickup"),
        })
        .await;
        Ok(())
    }

    /// Fans out a rider-pickup notice to the kitchen. Informational.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for nil IDs, an empty rider
    /// ID, or a restaurant mismatch, and [`GatewayError::OrderNotFound`]
    /// for unknown orders.
    pub async fn notify_delivery_pickup(
        &self,
        order_id: OrderId,
        restaurant_id: RestaurantId,
        rider_id: &str,
    ) -> Result<(), GatewayError> {
        validate_reference(order_id, restaurant_id)?;
        if rider_id.trim().is_empty() {
            return Err(GatewayError::Validation(
                "rider_id must not be empty".to_string(),
            ));
        }
        let order = self.store.get_order(order_id).await?;
        check_tenant(&order, restaurant_id)?;

        self.fan_out(&OrderEvent::DeliveryPickup {
            order_id,
            restaurant_id,
            rider_id: rider_id.to_string(),
            message: format!("Order #{order_id} picked up by rider {rider_id}"),
        })
        .await;
        Ok(())
    }

    /// Returns the open orders for a restaurant (backfill snapshot).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on storage failure.
    pub async fn open_orders(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, GatewayError> {
        self.store.open_orders(restaurant_id).await
    }

    /// Fetches a single order (read passthrough for the REST layer).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrderNotFound`] for unknown IDs.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, GatewayError> {
        self.store.get_order(order_id).await
    }

    /// Delivers an event to every live member of its target rooms.
    ///
    /// Best-effort per recipient: a closed channel (the connection's
    /// write task exited) is logged and counted, and never stops the
    /// remaining deliveries.
    async fn fan_out(&self, event: &OrderEvent) {
        let note = event.notification();
        let restaurant_id = event.restaurant_id();
        let mut delivered = 0usize;

        for role in routing::target_roles(event) {
            for member in self.registry.members_of(restaurant_id, *role).await {
                if member.sender.send(note.clone()).is_ok() {
                    delivered += 1;
                } else {
                    self.delivery_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        connection_id = %member.connection_id,
                        event = event.event_type_str(),
                        "delivery failed: connection closed"
                    );
                }
            }
        }

        tracing::debug!(
            event = event.event_type_str(),
            order_id = %event.order_id(),
            delivered,
            "event fanned out"
        );
    }

    /// Acquires the serialization lock for one order.
    async fn acquire(&self, order_id: OrderId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.order_locks.lock().await;
            Arc::clone(
                locks
                    .entry(order_id)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Drops the lock table entry once no other dispatch holds or awaits
    /// it, keeping the table bounded by in-flight orders.
    async fn release(&self, order_id: OrderId) {
        let mut locks = self.order_locks.lock().await;
        if let Some(lock) = locks.get(&order_id)
            && Arc::strong_count(lock) == 1
        {
            locks.remove(&order_id);
        }
    }
}

fn check_tenant(order: &Order, restaurant_id: RestaurantId) -> Result<(), GatewayError> {
    if order.restaurant_id == restaurant_id {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "order {} does not belong to restaurant {restaurant_id}",
            order.id
        )))
    }
}

fn validate_reference(order_id: OrderId, restaurant_id: RestaurantId) -> Result<(), GatewayError> {
    if order_id.is_nil() {
        return Err(GatewayError::Validation(
            "order_id must not be empty".to_string(),
        ));
    }
    if restaurant_id.is_nil() {
        return Err(GatewayError::Validation(
            "restaurant_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_new_order(new: &NewOrder) -> Result<(), GatewayError> {
    if new.restaurant_id.is_nil() {
        return Err(GatewayError::Validation(
            "restaurant_id must not be empty".to_string(),
        ));
    }
    if new.customer_name.trim().chars().count() < 2 {
        return Err(GatewayError::Validation(
            "customer name must be at least 2 characters".to_string(),
        ));
    }
    if new.customer_phone.trim().len() < 10 {
        return Err(GatewayError::Validation(
            "phone number must be at least 10 characters".to_string(),
        ));
    }
    if new.items.is_empty() {
        return Err(GatewayError::Validation(
            "items must not be empty".to_string(),
        ));
    }
    for item in &new.items {
        if item.quantity == 0 {
            return Err(GatewayError::Validation(
                "item quantity must be at least 1".to_string(),
            ));
        }
        if item.unit_price_cents < 0 {
            return Err(GatewayError::Validation(
                "item price must not be negative".to_string(),
            ));
        }
    }
    if new.delivery_fee_cents < 0 {
        return Err(GatewayError::Validation(
            "delivery fee must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{ConnectionId, Notification, OrderItem, OrderType, PaymentMethod, StaffRole};
    use crate::persistence::MemoryOrderStore;

    fn make_new_order(restaurant_id: RestaurantId) -> NewOrder {
        NewOrder {
            restaurant_id,
            table_id: None,
            customer_name: "Tharindu Weerasinghe".to_string(),
            customer_phone: "0779998887".to_string(),
            customer_email: None,
            items: vec![OrderItem {
                menu_item_id: uuid::Uuid::new_v4(),
                quantity: 2,
                unit_price_cents: 1100,
                special_instructions: None,
            }],
            order_type: OrderType::DineIn,
            payment_method: PaymentMethod::Cash,
            delivery_address: None,
            delivery_fee_cents: 0,
            special_instructions: None,
        }
    }

    fn make_dispatcher() -> OrderDispatcher {
        OrderDispatcher::new(
            Arc::new(MemoryOrderStore::new()),
            Arc::new(ConnectionRegistry::new()),
        )
    }

    async fn join_room(
        dispatcher: &OrderDispatcher,
        restaurant_id: RestaurantId,
        role: StaffRole,
    ) -> mpsc::UnboundedReceiver<Notification> {
        let conn = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        dispatcher.registry().register(conn, tx).await;
        dispatcher.registry().join(conn, restaurant_id, role).await;
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(note) = rx.try_recv() {
            out.push(note);
        }
        out
    }

    /// Store that accepts creates but fails every mutation afterwards.
    #[derive(Debug)]
    struct FailingStore {
        inner: MemoryOrderStore,
    }

    #[async_trait]
    impl OrderStore for FailingStore {
        async fn create_order(&self, order: Order) -> Result<Order, GatewayError> {
            self.inner.create_order(order).await
        }

        async fn update_order_status(
            &self,
            _order_id: OrderId,
            _status: OrderStatus,
        ) -> Result<Order, GatewayError> {
            Err(GatewayError::Persistence("injected failure".to_string()))
        }

        async fn update_payment_status(
            &self,
            _order_id: OrderId,
            _payment_status: PaymentStatus,
        ) -> Result<Order, GatewayError> {
            Err(GatewayError::Persistence("injected failure".to_string()))
        }

        async fn get_order(&self, order_id: OrderId) -> Result<Order, GatewayError> {
            self.inner.get_order(order_id).await
        }

        async fn open_orders(
            &self,
            restaurant_id: RestaurantId,
        ) -> Result<Vec<Order>, GatewayError> {
            self.inner.open_orders(restaurant_id).await
        }
    }

    #[tokio::test]
    async fn create_order_reaches_kitchen_and_waiter() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let result = dispatcher.create_order(make_new_order(restaurant)).await;
        let Ok(order) = result else {
            panic!("create failed");
        };

        for rx in [&mut kitchen, &mut waiter] {
            let notes = drain(rx);
            assert_eq!(notes.len(), 1);
            let Some(Notification::NewOrder { order: received }) = notes.into_iter().next() else {
                panic!("expected NewOrder notification");
            };
            assert_eq!(received.id, order.id);
        }
    }

    #[tokio::test]
    async fn events_never_cross_restaurants() {
        let dispatcher = make_dispatcher();
        let r1 = RestaurantId::new();
        let r2 = RestaurantId::new();
        let mut r1_kitchen = join_room(&dispatcher, r1, StaffRole::Kitchen).await;
        let mut r2_kitchen = join_room(&dispatcher, r2, StaffRole::Kitchen).await;

        let result = dispatcher.create_order(make_new_order(r1)).await;
        assert!(result.is_ok());

        assert_eq!(drain(&mut r1_kitchen).len(), 1);
        assert!(drain(&mut r2_kitchen).is_empty());
    }

    #[tokio::test]
    async fn kitchen_ready_notice_skips_the_kitchen() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let _ = drain(&mut kitchen);
        let _ = drain(&mut waiter);

        let result = dispatcher.notify_kitchen_ready(order.id, restaurant).await;
        assert!(result.is_ok());

        assert!(drain(&mut kitchen).is_empty());
        let waiter_notes = drain(&mut waiter);
        assert_eq!(waiter_notes.len(), 1);
        assert!(matches!(
            waiter_notes.first(),
            Some(Notification::OrderReady { .. })
        ));
    }

    #[tokio::test]
    async fn delivery_pickup_notice_skips_waiters() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let _ = drain(&mut kitchen);
        let _ = drain(&mut waiter);

        let result = dispatcher
            .notify_delivery_pickup(order.id, restaurant, "rider-42")
            .await;
        assert!(result.is_ok());

        assert!(drain(&mut waiter).is_empty());
        let kitchen_notes = drain(&mut kitchen);
        assert_eq!(kitchen_notes.len(), 1);
        let Some(Notification::RiderPickup { rider_id, .. }) = kitchen_notes.into_iter().next()
        else {
            panic!("expected RiderPickup notification");
        };
        assert_eq!(rider_id, "rider-42");
    }

    #[tokio::test]
    async fn persistence_failure_broadcasts_nothing() {
        let store = FailingStore {
            inner: MemoryOrderStore::new(),
        };
        let restaurant = RestaurantId::new();
        let dispatcher =
            OrderDispatcher::new(Arc::new(store), Arc::new(ConnectionRegistry::new()));
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let _ = drain(&mut kitchen);
        let _ = drain(&mut waiter);

        let result = dispatcher
            .update_order_status(order.id, OrderStatus::Confirmed, restaurant)
            .await;
        assert!(matches!(result, Err(GatewayError::Persistence(_))));

        assert!(drain(&mut kitchen).is_empty());
        assert!(drain(&mut waiter).is_empty());
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_the_store() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;

        let mut bad = make_new_order(restaurant);
        bad.items.clear();
        let result = dispatcher.create_order(bad).await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
        assert!(drain(&mut kitchen).is_empty());

        let Ok(open) = dispatcher.open_orders(restaurant).await else {
            panic!("open_orders failed");
        };
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn unregistered_connection_receives_nothing() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();

        let conn = ConnectionId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        dispatcher.registry().register(conn, tx).await;
        dispatcher
            .registry()
            .join(conn, restaurant, StaffRole::Kitchen)
            .await;
        dispatcher.registry().unregister(conn).await;

        let result = dispatcher.create_order(make_new_order(restaurant)).await;
        assert!(result.is_ok());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn dead_connection_does_not_block_the_room() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();

        // One member whose receiving end is already gone.
        let dead = ConnectionId::new();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        drop(dead_rx);
        dispatcher.registry().register(dead, dead_tx).await;
        dispatcher
            .registry()
            .join(dead, restaurant, StaffRole::Kitchen)
            .await;

        let mut alive = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;

        let result = dispatcher.create_order(make_new_order(restaurant)).await;
        assert!(result.is_ok());

        assert_eq!(drain(&mut alive).len(), 1);
        assert_eq!(dispatcher.delivery_failures(), 1);
    }

    #[tokio::test]
    async fn sequential_updates_arrive_in_commit_order() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let _ = drain(&mut waiter);

        let first = dispatcher
            .update_order_status(order.id, OrderStatus::Confirmed, restaurant)
            .await;
        assert!(first.is_ok());
        let second = dispatcher
            .update_order_status(order.id, OrderStatus::Preparing, restaurant)
            .await;
        assert!(second.is_ok());

        let notes = drain(&mut waiter);
        let statuses: Vec<OrderStatus> = notes
            .into_iter()
            .filter_map(|n| match n {
                Notification::StatusUpdate { order } => Some(order.status),
                _ => None,
            })
            .collect();
        assert_eq!(
            statuses,
            vec![OrderStatus::Confirmed, OrderStatus::Preparing]
        );
    }

    #[tokio::test]
    async fn ready_transition_adds_waiter_pickup_notice() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let result = dispatcher
                .update_order_status(order.id, status, restaurant)
                .await;
            assert!(result.is_ok());
        }

        // Kitchen: created + three status updates, no pickup notice.
        let kitchen_notes = drain(&mut kitchen);
        assert_eq!(kitchen_notes.len(), 4);
        assert!(
            !kitchen_notes
                .iter()
                .any(|n| matches!(n, Notification::OrderReady { .. }))
        );

        // Waiter: the same four plus the supplementary notice.
        let waiter_notes = drain(&mut waiter);
        assert_eq!(waiter_notes.len(), 5);
        assert!(
            waiter_notes
                .iter()
                .any(|n| matches!(n, Notification::OrderReady { .. }))
        );
    }

    #[tokio::test]
    async fn lock_table_does_not_leak_entries() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();

        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let result = dispatcher
            .update_order_status(order.id, OrderStatus::Cancelled, restaurant)
            .await;
        assert!(result.is_ok());

        assert!(dispatcher.order_locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        let dispatcher = make_dispatcher();
        let restaurant = RestaurantId::new();
        let mut kitchen = join_room(&dispatcher, restaurant, StaffRole::Kitchen).await;
        let mut waiter = join_room(&dispatcher, restaurant, StaffRole::Waiter).await;

        // Customer places an order: both rooms see it.
        let Ok(order) = dispatcher.create_order(make_new_order(restaurant)).await else {
            panic!("create failed");
        };
        let kitchen_created = drain(&mut kitchen);
        let waiter_created = drain(&mut waiter);
        for notes in [&kitchen_created, &waiter_created] {
            let Some(Notification::NewOrder { order: received }) = notes.first() else {
                panic!("expected NewOrder");
            };
            assert_eq!(received.id, order.id);
        }

        // Kitchen walks it to READY.
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let result = dispatcher
                .update_order_status(order.id, status, restaurant)
                .await;
            assert!(result.is_ok());
        }

        let kitchen_notes = drain(&mut kitchen);
        let waiter_notes = drain(&mut waiter);

        // Both observed READY as the final status update...
        let last_status = |notes: &[Notification]| {
            notes
                .iter()
                .filter_map(|n| match n {
                    Notification::StatusUpdate { order } => Some(order.status),
                    _ => None,
                })
                .next_back()
        };
        assert_eq!(last_status(&kitchen_notes), Some(OrderStatus::Ready));
        assert_eq!(last_status(&waiter_notes), Some(OrderStatus::Ready));

        // ...but only the waiter got the supplementary pickup notice.
        assert!(
            !kitchen_notes
                .iter()
                .any(|n| matches!(n, Notification::OrderReady { .. }))
        );
        assert!(
            waiter_notes
                .iter()
                .any(|n| matches!(n, Notification::OrderReady { .. }))
        );
    }
}
