//! Sandwich recipe HTTP handlers.
//!
//! ```text
//! GET    /api/v1/sandwiches
//! POST   /api/v1/sandwiches
//! GET    /api/v1/sandwiches/{id}
//! PUT    /api/v1/sandwiches/{id}
//! DELETE /api/v1/sandwiches/{id}
//! ```
//!
//! Weight and cook time totals are derived server side from the member
//! products, so the request body carries only the composition.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Sandwich, SandwichDraft, Size};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_uuid, parse_uuid_list, require_non_blank,
};

#[derive(Debug, Deserialize)]
struct SandwichPath {
    id: String,
}

/// Request payload for creating or replacing a sandwich.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SandwichBody {
    #[schema(example = "Croque Monsieur")]
    pub name: String,
    pub size: Size,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub product_ids: Vec<String>,
}

fn parse_sandwich_body(body: SandwichBody) -> Result<SandwichDraft, Error> {
    let name = require_non_blank(body.name, FieldName::new("name"))?;
    let product_ids = parse_uuid_list(body.product_ids, FieldName::new("productIds"))?;
    Ok(SandwichDraft {
        name,
        size: body.size,
        product_ids,
    })
}

/// List every sandwich in name order.
#[utoipa::path(
    get,
    path = "/api/v1/sandwiches",
    responses(
        (status = 200, description = "All sandwiches", body = [Sandwich]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sandwiches"],
    operation_id = "listSandwiches"
)]
#[get("/sandwiches")]
pub async fn list_sandwiches(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Sandwich>>> {
    Ok(web::Json(state.sandwiches.list_sandwiches().await?))
}

/// Create a sandwich from a list of member product identifiers.
#[utoipa::path(
    post,
    path = "/api/v1/sandwiches",
    request_body = SandwichBody,
    responses(
        (status = 201, description = "Sandwich created", body = Sandwich),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Name already in use", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sandwiches"],
    operation_id = "createSandwich"
)]
#[post("/sandwiches")]
pub async fn create_sandwich(
    state: web::Data<HttpState>,
    payload: web::Json<SandwichBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_sandwich_body(payload.into_inner())?;
    let sandwich = state.sandwiches.create_sandwich(draft).await?;
    Ok(HttpResponse::Created().json(sandwich))
}

/// Fetch a single sandwich.
#[utoipa::path(
    get,
    path = "/api/v1/sandwiches/{id}",
    params(("id" = String, Path, format = "uuid", description = "Sandwich identifier")),
    responses(
        (status = 200, description = "The sandwich", body = Sandwich),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown sandwich", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sandwiches"],
    operation_id = "getSandwich"
)]
#[get("/sandwiches/{id}")]
pub async fn get_sandwich(
    state: web::Data<HttpState>,
    path: web::Path<SandwichPath>,
) -> ApiResult<web::Json<Sandwich>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    Ok(web::Json(state.sandwiches.get_sandwich(id).await?))
}

/// Replace a sandwich's name, size and composition.
#[utoipa::path(
    put,
    path = "/api/v1/sandwiches/{id}",
    params(("id" = String, Path, format = "uuid", description = "Sandwich identifier")),
    request_body = SandwichBody,
    responses(
        (status = 200, description = "Sandwich replaced", body = Sandwich),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown sandwich", body = Error),
        (status = 409, description = "Name already in use", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sandwiches"],
    operation_id = "updateSandwich"
)]
#[put("/sandwiches/{id}")]
pub async fn update_sandwich(
    state: web::Data<HttpState>,
    path: web::Path<SandwichPath>,
    payload: web::Json<SandwichBody>,
) -> ApiResult<web::Json<Sandwich>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let draft = parse_sandwich_body(payload.into_inner())?;
    Ok(web::Json(
        state.sandwiches.update_sandwich(id, draft).await?,
    ))
}

/// Delete a sandwich.
///
/// Deletion is refused while any order still references the sandwich.
#[utoipa::path(
    delete,
    path = "/api/v1/sandwiches/{id}",
    params(("id" = String, Path, format = "uuid", description = "Sandwich identifier")),
    responses(
        (status = 204, description = "Sandwich deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown sandwich", body = Error),
        (status = 409, description = "Sandwich still referenced by orders", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sandwiches"],
    operation_id = "deleteSandwich"
)]
#[delete("/sandwiches/{id}")]
pub async fn delete_sandwich(
    state: web::Data<HttpState>,
    path: web::Path<SandwichPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    state.sandwiches.delete_sandwich(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "sandwiches_tests.rs"]
mod tests;
