//! Event-to-room routing policy.
//!
//! A pure, stateless mapping from event type to the staff roles whose
//! rooms receive it. Most events reach both roles; the two supplementary
//! notices broadcast asymmetrically: "ready" notices go to waiters only,
//! rider-pickup notices to the kitchen only.

use super::event::OrderEvent;
use super::room::StaffRole;

/// Returns the roles whose rooms must receive `event`.
///
/// | event | kitchen | waiter |
/// |---|---|---|
/// | `OrderCreated` | yes | yes |
/// | `OrderStatusChanged` | yes | yes |
/// | `PaymentStatusChanged` | yes | yes |
/// | `KitchenReady` | no | yes |
/// | `DeliveryPickup` | yes | no |
#[must_use]
pub const fn target_roles(event: &OrderEvent) -> &'static [StaffRole] {
    match event {
        OrderEvent::OrderCreated { .. }
        | OrderEvent::OrderStatusChanged { .. }
        | OrderEvent::PaymentStatusChanged { .. } => &[StaffRole::Kitchen, StaffRole::Waiter],
        OrderEvent::KitchenReady { .. } => &[StaffRole::Waiter],
        OrderEvent::DeliveryPickup { .. } => &[StaffRole::Kitchen],
    }
}
