//! Order lifecycle HTTP handlers.
//!
//! ```text
//! GET    /api/v1/orders
//! POST   /api/v1/orders
//! GET    /api/v1/orders/{id}
//! PUT    /api/v1/orders/{id}
//! DELETE /api/v1/orders/{id}
//! POST   /api/v1/orders/{id}/change-status
//! POST   /api/v1/verify-weight
//! ```
//!
//! Order totals derive from the referenced sandwich. Moving an order into
//! the done state draws down member product stock exactly once; the scale
//! endpoint performs that move when the measured weight is within
//! tolerance.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Order, OrderDraft, OrderStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_uuid, require_non_negative, require_positive,
};

#[derive(Debug, Deserialize)]
struct OrderPath {
    id: String,
}

/// Request payload for creating or replacing an order.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    #[schema(format = "uuid")]
    pub sandwich_id: String,
    #[schema(example = 2)]
    pub quantity: i32,
    /// Initial workflow state; omitted means pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

/// Request payload for the change-status action.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusBody {
    pub status: OrderStatus,
}

/// Request payload for a scale reading.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyWeightBody {
    #[schema(format = "uuid")]
    pub order_id: String,
    #[schema(example = 510)]
    pub measured_grams: i32,
}

fn parse_order_body(body: OrderBody) -> Result<OrderDraft, Error> {
    let sandwich_id = parse_uuid(body.sandwich_id, FieldName::new("sandwichId"))?;
    let quantity = require_positive(body.quantity, FieldName::new("quantity"))?;
    Ok(OrderDraft {
        sandwich_id,
        quantity,
        status: body.status.unwrap_or_default(),
        barcode: body.barcode,
    })
}

/// List every order, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "All orders", body = [Order]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Order>>> {
    Ok(web::Json(state.orders.list_orders().await?))
}

/// Create an order for a sandwich.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = OrderBody,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Barcode already in use", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<OrderBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_order_body(payload.into_inner())?;
    let order = state.orders.create_order(draft).await?;
    Ok(HttpResponse::Created().json(order))
}

/// Fetch a single order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, format = "uuid", description = "Order identifier")),
    responses(
        (status = 200, description = "The order", body = Order),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<OrderPath>,
) -> ApiResult<web::Json<Order>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    Ok(web::Json(state.orders.get_order(id).await?))
}

/// Replace an order.
///
/// A replacement whose status crosses into done draws down stock exactly
/// as the change-status action would.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, format = "uuid", description = "Order identifier")),
    request_body = OrderBody,
    responses(
        (status = 200, description = "Order replaced", body = Order),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Insufficient stock or duplicate barcode", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    path: web::Path<OrderPath>,
    payload: web::Json<OrderBody>,
) -> ApiResult<web::Json<Order>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let draft = parse_order_body(payload.into_inner())?;
    Ok(web::Json(state.orders.update_order(id, draft).await?))
}

/// Delete an order.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, format = "uuid", description = "Order identifier")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    path: web::Path<OrderPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    state.orders.delete_order(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Move an order to another workflow state.
///
/// Entering done draws down stock for every member of the ordered
/// sandwich; a shortfall rejects the whole transition.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/change-status",
    params(("id" = String, Path, format = "uuid", description = "Order identifier")),
    request_body = ChangeStatusBody,
    responses(
        (status = 200, description = "Order moved", body = Order),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Insufficient stock to complete", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "changeStatus"
)]
#[post("/orders/{id}/change-status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    path: web::Path<OrderPath>,
    payload: web::Json<ChangeStatusBody>,
) -> ApiResult<web::Json<Order>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let status = payload.into_inner().status;
    Ok(web::Json(state.orders.change_status(id, status).await?))
}

/// Check a scale reading against an order's stored weight.
///
/// A reading within tolerance completes the order; anything else sends it
/// back to pending.
#[utoipa::path(
    post,
    path = "/api/v1/verify-weight",
    request_body = VerifyWeightBody,
    responses(
        (status = 200, description = "Order after verification", body = Order),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Insufficient stock to complete", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "verifyWeight"
)]
#[post("/verify-weight")]
pub async fn verify_weight(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyWeightBody>,
) -> ApiResult<web::Json<Order>> {
    let body = payload.into_inner();
    let id = parse_uuid(body.order_id, FieldName::new("orderId"))?;
    let measured = require_non_negative(body.measured_grams, FieldName::new("measuredGrams"))?;
    Ok(web::Json(state.orders.verify_weight(id, measured).await?))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
