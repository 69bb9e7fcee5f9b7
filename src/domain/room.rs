//! Multicast room keys.
//!
//! A room is a derived multicast group, never a persisted entity: the
//! key is a (restaurant, staff role) pair and membership is materialized
//! only inside the [`super::registry::ConnectionRegistry`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::RestaurantId;

/// Staff role a connection joins a room as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Kitchen display stations.
    Kitchen,
    /// Waiter stations and handheld devices.
    Waiter,
}

impl StaffRole {
    /// Returns the role's wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Waiter => "waiter",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key identifying one multicast room: a restaurant crossed with a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomKey {
    /// Tenant half of the key.
    pub restaurant_id: RestaurantId,
    /// Role half of the key.
    pub role: StaffRole,
}

impl RoomKey {
    /// Creates a room key.
    #[must_use]
    pub const fn new(restaurant_id: RestaurantId, role: StaffRole) -> Self {
        Self {
            restaurant_id,
            role,
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.role, self.restaurant_id)
    }
}
