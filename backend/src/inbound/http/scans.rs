//! Scale scan HTTP handlers.
//!
//! ```text
//! GET    /api/v1/scans
//! POST   /api/v1/scans
//! GET    /api/v1/scans/{id}
//! PUT    /api/v1/scans/{id}
//! DELETE /api/v1/scans/{id}
//! ```
//!
//! Scans are an audit log of what the scale reported. Logging a scan never
//! touches orders; the verify-weight endpoint does that.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Scan, ScanDraft, map_scan_repository_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_uuid, require_non_blank, require_non_negative,
};

#[derive(Debug, Deserialize)]
struct ScanPath {
    id: String,
}

/// Request payload for logging or replacing a scan.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanBody {
    #[schema(example = "KIOSK-0001")]
    pub code: String,
    #[schema(example = 510)]
    pub weight_grams: i32,
}

fn parse_scan_body(body: ScanBody) -> Result<ScanDraft, Error> {
    let code = require_non_blank(body.code, FieldName::new("code"))?;
    let weight_grams = require_non_negative(body.weight_grams, FieldName::new("weightGrams"))?;
    Ok(ScanDraft { code, weight_grams })
}

async fn find_scan(state: &HttpState, id: Uuid) -> Result<Scan, Error> {
    state
        .scans
        .find_by_id(&id)
        .await
        .map_err(map_scan_repository_error)?
        .ok_or_else(|| Error::not_found(format!("scan {id} not found")))
}

/// List every scan, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/scans",
    responses(
        (status = 200, description = "All scans", body = [Scan]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["scans"],
    operation_id = "listScans"
)]
#[get("/scans")]
pub async fn list_scans(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Scan>>> {
    let scans = state.scans.list().await.map_err(map_scan_repository_error)?;
    Ok(web::Json(scans))
}

/// Log a scan.
#[utoipa::path(
    post,
    path = "/api/v1/scans",
    request_body = ScanBody,
    responses(
        (status = 201, description = "Scan logged", body = Scan),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["scans"],
    operation_id = "createScan"
)]
#[post("/scans")]
pub async fn create_scan(
    state: web::Data<HttpState>,
    payload: web::Json<ScanBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_scan_body(payload.into_inner())?;
    let scan = Scan::from_draft(Uuid::new_v4(), draft, Utc::now());
    state
        .scans
        .insert(&scan)
        .await
        .map_err(map_scan_repository_error)?;
    Ok(HttpResponse::Created().json(scan))
}

/// Fetch a single scan.
#[utoipa::path(
    get,
    path = "/api/v1/scans/{id}",
    params(("id" = String, Path, format = "uuid", description = "Scan identifier")),
    responses(
        (status = 200, description = "The scan", body = Scan),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown scan", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["scans"],
    operation_id = "getScan"
)]
#[get("/scans/{id}")]
pub async fn get_scan(
    state: web::Data<HttpState>,
    path: web::Path<ScanPath>,
) -> ApiResult<web::Json<Scan>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    Ok(web::Json(find_scan(&state, id).await?))
}

/// Replace a scan's code and weight.
///
/// The original timestamp is kept; only the reported values change.
#[utoipa::path(
    put,
    path = "/api/v1/scans/{id}",
    params(("id" = String, Path, format = "uuid", description = "Scan identifier")),
    request_body = ScanBody,
    responses(
        (status = 200, description = "Scan replaced", body = Scan),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown scan", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["scans"],
    operation_id = "updateScan"
)]
#[put("/scans/{id}")]
pub async fn update_scan(
    state: web::Data<HttpState>,
    path: web::Path<ScanPath>,
    payload: web::Json<ScanBody>,
) -> ApiResult<web::Json<Scan>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let existing = find_scan(&state, id).await?;
    let draft = parse_scan_body(payload.into_inner())?;
    let updated = Scan::from_draft(id, draft, existing.scanned_at);
    let found = state
        .scans
        .update(&updated)
        .await
        .map_err(map_scan_repository_error)?;
    if !found {
        return Err(Error::not_found(format!("scan {id} not found")));
    }
    Ok(web::Json(updated))
}

/// Delete a scan.
#[utoipa::path(
    delete,
    path = "/api/v1/scans/{id}",
    params(("id" = String, Path, format = "uuid", description = "Scan identifier")),
    responses(
        (status = 204, description = "Scan deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown scan", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["scans"],
    operation_id = "deleteScan"
)]
#[delete("/scans/{id}")]
pub async fn delete_scan(
    state: web::Data<HttpState>,
    path: web::Path<ScanPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let found = state
        .scans
        .delete(&id)
        .await
        .map_err(map_scan_repository_error)?;
    if !found {
        return Err(Error::not_found(format!("scan {id} not found")));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "scans_tests.rs"]
mod tests;
