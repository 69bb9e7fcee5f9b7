//! Order handlers: create, list, get, status and payment updates.
//!
//! All writes go through the [`crate::service::OrderDispatcher`], so a
//! REST mutation broadcasts to the same rooms a WebSocket command would —
//! there is no second write path.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    OrderListParams, OrderListResponse, OrderResponse, PaginationMeta, UpdatePaymentRequest,
    UpdateStatusRequest,
};
use crate::app_state::AppState;
use crate::domain::{NewOrder, OrderId, OrderStatus, PaymentStatus};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /orders` — Create a new order.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid payload or persistence failure.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "Create a new order",
    description = "Validates the payload, persists the order, and broadcasts it to the restaurant's kitchen and waiter rooms.",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid order payload", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<NewOrder>,
) -> Result<impl IntoResponse, GatewayError> {
    let order = state.dispatcher.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// `GET /orders` — List open orders for a restaurant with pagination.
///
/// # Errors
///
/// Returns [`GatewayError`] on persistence failures.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "List open orders",
    description = "Returns a paginated list of open (non-terminal) orders for the given restaurant, oldest first.",
    params(OrderListParams),
    responses(
        (status = 200, description = "Paginated open orders", body = OrderListResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let params = params.clamped();
    let orders = state.dispatcher.open_orders(params.restaurant_id).await?;

    let total = orders.len() as u32;
    let per_page = params.per_page;
    let page = params.page;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    let start = ((page - 1) * per_page) as usize;
    let data: Vec<_> = orders
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Ok(Json(OrderListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `GET /orders/:id` — Get order details.
///
/// # Errors
///
/// Returns [`GatewayError::OrderNotFound`] if the order does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    summary = "Get order details",
    description = "Returns a single order including items, totals, and lifecycle state.",
    params(
        ("id" = uuid::Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order details", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let order = state.dispatcher.get_order(OrderId::from_uuid(id)).await?;
    Ok(Json(OrderResponse { order }))
}

/// `PATCH /orders/:id/status` — Transition an order's lifecycle status.
///
/// # Errors
///
/// Returns [`GatewayError`] for unknown orders, illegal transitions, or
/// persistence failures; nothing is broadcast on error.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    tag = "Orders",
    summary = "Update order status",
    description = "Applies a lifecycle transition and broadcasts the committed change to the restaurant's rooms.",
    params(
        ("id" = uuid::Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status string", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Illegal transition", body = ErrorResponse),
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let order_id = OrderId::from_uuid(id);
    let status: OrderStatus = req.status.parse()?;

    // Resolve the tenant from the stored order; REST callers address
    // orders globally by ID.
    let current = state.dispatcher.get_order(order_id).await?;
    let order = state
        .dispatcher
        .update_order_status(order_id, status, current.restaurant_id)
        .await?;
    Ok(Json(OrderResponse { order }))
}

/// `PATCH /orders/:id/payment` — Update an order's payment status.
///
/// # Errors
///
/// Returns [`GatewayError`] for unknown orders or persistence failures.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/payment",
    tag = "Orders",
    summary = "Update payment status",
    description = "Records a payment-gateway outcome and broadcasts the committed change to the restaurant's rooms.",
    params(
        ("id" = uuid::Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment status updated", body = OrderResponse),
        (status = 400, description = "Unknown payment status string", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let order_id = OrderId::from_uuid(id);
    let payment_status: PaymentStatus = req.payment_status.parse()?;

    let current = state.dispatcher.get_order(order_id).await?;
    let order = state
        .dispatcher
        .update_payment_status(order_id, payment_status, current.restaurant_id)
        .await?;
    Ok(Json(OrderResponse { order }))
}

/// Order routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/payment", patch(update_payment_status))
}
