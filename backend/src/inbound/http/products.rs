//! Product inventory HTTP handlers.
//!
//! ```text
//! GET    /api/v1/products
//! POST   /api/v1/products
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! POST   /api/v1/products/{id}/add-stock
//! GET    /api/v1/stock
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Colour, Error, Product, ProductDraft, Size, StockSnapshot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_uuid, require_non_blank, require_non_negative, require_positive,
};

#[derive(Debug, Deserialize)]
struct ProductPath {
    id: String,
}

/// Request payload for creating or replacing a product.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    #[schema(example = "Cheddar")]
    pub name: String,
    pub size: Size,
    #[schema(example = 25)]
    pub weight_grams: i32,
    pub colour: Colour,
    #[schema(example = 40)]
    pub quantity_in_stock: i32,
    #[schema(example = 90)]
    pub cook_time_seconds: Option<i32>,
}

/// Request payload for the add-stock action.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStockBody {
    #[schema(example = 12)]
    pub amount: i32,
}

fn parse_product_body(body: ProductBody) -> Result<ProductDraft, Error> {
    let name = require_non_blank(body.name, FieldName::new("name"))?;
    let weight_grams = require_non_negative(body.weight_grams, FieldName::new("weightGrams"))?;
    let quantity_in_stock =
        require_non_negative(body.quantity_in_stock, FieldName::new("quantityInStock"))?;
    let cook_time_seconds = body
        .cook_time_seconds
        .map(|seconds| require_non_negative(seconds, FieldName::new("cookTimeSeconds")))
        .transpose()?;
    Ok(ProductDraft {
        name,
        size: body.size,
        weight_grams,
        colour: body.colour,
        quantity_in_stock,
        cook_time_seconds,
    })
}

/// List every product in name order.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "All products", body = [Product]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Product>>> {
    Ok(web::Json(state.products.list_products().await?))
}

/// Create a product.
///
/// # Examples
/// ```no_run
/// use actix_web::{HttpResponse, web};
/// use kiosk_backend::domain::{Colour, Size};
/// use kiosk_backend::inbound::http::ApiResult;
/// use kiosk_backend::inbound::http::products::{ProductBody, create_product};
/// use kiosk_backend::inbound::http::state::HttpState;
///
/// async fn call_handler(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
///     let payload = web::Json(ProductBody {
///         name: "Cheddar".to_owned(),
///         size: Size::M,
///         weight_grams: 25,
///         colour: Colour::Yellow,
///         quantity_in_stock: 40,
///         cook_time_seconds: None,
///     });
///     create_product(state, payload).await
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductBody,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Name already in use", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<ProductBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_product_body(payload.into_inner())?;
    let product = state.products.create_product(draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Fetch a single product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, format = "uuid", description = "Product identifier")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown product", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<ProductPath>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    Ok(web::Json(state.products.get_product(id).await?))
}

/// Replace a product.
///
/// Sandwiches containing the product have their derived totals refreshed in
/// the same operation.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, format = "uuid", description = "Product identifier")),
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product replaced", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown product", body = Error),
        (status = 409, description = "Name already in use", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<ProductPath>,
    payload: web::Json<ProductBody>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let draft = parse_product_body(payload.into_inner())?;
    Ok(web::Json(state.products.update_product(id, draft).await?))
}

/// Delete a product.
///
/// The product is dropped from any sandwich containing it and those
/// sandwiches recompute their totals.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, format = "uuid", description = "Product identifier")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown product", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<ProductPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    state.products.delete_product(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add delivered units to a product's stock.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/add-stock",
    params(("id" = String, Path, format = "uuid", description = "Product identifier")),
    request_body = AddStockBody,
    responses(
        (status = 200, description = "Stock topped up", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown product", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "addStock"
)]
#[post("/products/{id}/add-stock")]
pub async fn add_stock(
    state: web::Data<HttpState>,
    path: web::Path<ProductPath>,
    payload: web::Json<AddStockBody>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let amount = require_positive(payload.into_inner().amount, FieldName::new("amount"))?;
    Ok(web::Json(state.products.top_up_stock(id, amount).await?))
}

/// Read the current stock snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    responses(
        (
            status = 200,
            description = "Current stock snapshot",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = StockSnapshot
        ),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["stock"],
    operation_id = "currentStock"
)]
#[get("/stock")]
pub async fn current_stock(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let snapshot = state.products.stock_snapshot().await?;
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(snapshot))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
