//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ConnectionRegistry;
use crate::service::OrderDispatcher;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Constructed once at startup and passed by injection — there is no
/// lazily-created global server instance.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dispatcher for all order mutations and notifications.
    pub dispatcher: Arc<OrderDispatcher>,
    /// Registry of live WebSocket connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Whether joins push an open-order snapshot to the joining client.
    pub backfill_enabled: bool,
}
