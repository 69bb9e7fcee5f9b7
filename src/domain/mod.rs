//! Domain layer: identifiers, order model, events, rooms, and the
//! connection registry.
//!
//! This module contains the server-side domain model for the real-time
//! order core: order identity and lifecycle, the transient events emitted
//! after committed mutations, the room routing policy, and the registry
//! of live connections that fan-out delivers through.

pub mod event;
pub mod ids;
pub mod notification;
pub mod order;
pub mod registry;
pub mod room;
pub mod routing;

pub use event::OrderEvent;
pub use ids::{ConnectionId, OrderId, RestaurantId};
pub use notification::Notification;
pub use order::{NewOrder, Order, OrderItem, OrderStatus, OrderType, PaymentMethod, PaymentStatus};
pub use registry::{ConnectionRegistry, NotificationSender, RoomMember};
pub use room::{RoomKey, StaffRole};
