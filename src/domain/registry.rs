//! Live connection tracking and room membership.
//!
//! [`ConnectionRegistry`] is the only long-lived shared mutable state in
//! the fan-out core. All membership maps sit behind a single
//! [`tokio::sync::RwLock`]; membership churn is rare relative to dispatch
//! volume, so a coarse lock is sufficient.
//!
//! Delivery is decoupled from the socket: each connection registers an
//! unbounded [`mpsc`] sender, and the connection's own write task drains
//! the receiving end. A send into a closed channel (the task exited) is
//! the per-recipient delivery failure the dispatcher logs and skips.

use std::collections::{HashMap, HashSet};

use tokio::sync::{RwLock, mpsc};

use super::Notification;
use super::ids::{ConnectionId, RestaurantId};
use super::room::{RoomKey, StaffRole};

/// Channel end the registry holds for each live connection.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

/// One room member in a delivery snapshot.
#[derive(Debug, Clone)]
pub struct RoomMember {
    /// The member's connection ID.
    pub connection_id: ConnectionId,
    /// Sender for the member's outbound channel.
    pub sender: NotificationSender,
}

#[derive(Debug)]
struct ConnectionEntry {
    sender: NotificationSender,
    rooms: HashSet<RoomKey>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    rooms: HashMap<RoomKey, HashSet<ConnectionId>>,
}

/// Tracks which connections exist and which rooms each belongs to.
///
/// # Concurrency
///
/// Every method takes the coarse lock briefly and never holds it across
/// an await point that isn't the lock acquisition itself; in particular
/// [`ConnectionRegistry::members_of`] returns a snapshot copy so delivery
/// iterates without holding the lock.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection with its outbound sender.
    ///
    /// Re-registering an existing ID replaces its sender and clears its
    /// room memberships (a fresh handshake supersedes stale state).
    pub async fn register(&self, connection_id: ConnectionId, sender: NotificationSender) {
        let mut inner = self.inner.write().await;
        if let Some(old) = inner.connections.insert(
            connection_id,
            ConnectionEntry {
                sender,
                rooms: HashSet::new(),
            },
        ) {
            for key in &old.rooms {
                if let Some(members) = inner.rooms.get_mut(key) {
                    members.remove(&connection_id);
                    if members.is_empty() {
                        inner.rooms.remove(key);
                    }
                }
            }
        }
        tracing::debug!(%connection_id, "connection registered");
    }

    /// Idempotently adds a connection to the (restaurant, role) room.
    ///
    /// Returns `false` without raising if the connection is unknown —
    /// disconnect races are expected and benign.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        restaurant_id: RestaurantId,
        role: StaffRole,
    ) -> bool {
        let key = RoomKey::new(restaurant_id, role);
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.connections.get_mut(&connection_id) else {
            tracing::debug!(%connection_id, room = %key, "join for unknown connection ignored");
            return false;
        };
        entry.rooms.insert(key);
        inner.rooms.entry(key).or_default().insert(connection_id);
        tracing::info!(%connection_id, room = %key, "joined room");
        true
    }

    /// Removes a connection from the (restaurant, role) room. Unknown
    /// connections and non-membership are benign no-ops.
    pub async fn leave(
        &self,
        connection_id: ConnectionId,
        restaurant_id: RestaurantId,
        role: StaffRole,
    ) {
        let key = RoomKey::new(restaurant_id, role);
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.connections.get_mut(&connection_id) {
            entry.rooms.remove(&key);
        }
        if let Some(members) = inner.rooms.get_mut(&key) {
            members.remove(&connection_id);
            if members.is_empty() {
                inner.rooms.remove(&key);
            }
        }
    }

    /// Removes a connection from the registry and all its rooms.
    /// Safe to call multiple times.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.connections.remove(&connection_id) else {
            return;
        };
        for key in &entry.rooms {
            if let Some(members) = inner.rooms.get_mut(key) {
                members.remove(&connection_id);
                if members.is_empty() {
                    inner.rooms.remove(key);
                }
            }
        }
        tracing::debug!(%connection_id, "connection unregistered");
    }

    /// Returns a snapshot copy of the room's members for delivery.
    ///
    /// The snapshot decouples fan-out iteration from concurrent
    /// join/leave/unregister calls; a member that disconnects between the
    /// snapshot and the send simply fails that one send.
    pub async fn members_of(
        &self,
        restaurant_id: RestaurantId,
        role: StaffRole,
    ) -> Vec<RoomMember> {
        let key = RoomKey::new(restaurant_id, role);
        let inner = self.inner.read().await;
        let Some(ids) = inner.rooms.get(&key) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                inner.connections.get(id).map(|entry| RoomMember {
                    connection_id: *id,
                    sender: entry.sender.clone(),
                })
            })
            .collect()
    }

    /// Returns the number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}
