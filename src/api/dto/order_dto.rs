//! Order-related DTOs for create, get, list, and update operations.
//!
//! The create request body is the domain [`crate::domain::NewOrder`]
//! directly — totals and status are always computed server-side, so
//! there is nothing to translate.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::Order;

/// Response body wrapping a single order.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    /// The order.
    pub order: Order,
}

/// Paginated list response for `GET /orders`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    /// Open orders for the requested page.
    pub data: Vec<Order>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Request body for `PATCH /orders/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target lifecycle status as a wire string (e.g. `"READY"`).
    pub status: String,
}

/// Request body for `PATCH /orders/{id}/payment`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    /// Target payment status as a wire string (e.g. `"PAID"`).
    pub payment_status: String,
}
