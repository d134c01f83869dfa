//! Climate reading HTTP handlers.
//!
//! ```text
//! GET    /api/v1/climate-readings
//! POST   /api/v1/climate-readings
//! GET    /api/v1/climate-readings/{id}
//! PUT    /api/v1/climate-readings/{id}
//! DELETE /api/v1/climate-readings/{id}
//! ```
//!
//! Readings are pure log data kept directly behind the repository port;
//! the server assigns ids and timestamps.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ClimateReading, ClimateReadingDraft, Error, map_climate_repository_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

#[derive(Debug, Deserialize)]
struct ClimateReadingPath {
    id: String,
}

/// Request payload for logging or replacing a climate reading.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClimateReadingBody {
    #[schema(example = 21.5)]
    pub temperature_celsius: f64,
    #[schema(example = 48.0)]
    pub humidity_percent: f64,
}

impl From<ClimateReadingBody> for ClimateReadingDraft {
    fn from(body: ClimateReadingBody) -> Self {
        Self {
            temperature_celsius: body.temperature_celsius,
            humidity_percent: body.humidity_percent,
        }
    }
}

async fn find_reading(state: &HttpState, id: Uuid) -> Result<ClimateReading, Error> {
    state
        .climate
        .find_by_id(&id)
        .await
        .map_err(map_climate_repository_error)?
        .ok_or_else(|| Error::not_found(format!("climate reading {id} not found")))
}

/// List every climate reading, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/climate-readings",
    responses(
        (status = 200, description = "All climate readings", body = [ClimateReading]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["climate"],
    operation_id = "listClimateReadings"
)]
#[get("/climate-readings")]
pub async fn list_climate_readings(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ClimateReading>>> {
    let readings = state
        .climate
        .list()
        .await
        .map_err(map_climate_repository_error)?;
    Ok(web::Json(readings))
}

/// Log a climate reading.
#[utoipa::path(
    post,
    path = "/api/v1/climate-readings",
    request_body = ClimateReadingBody,
    responses(
        (status = 201, description = "Reading logged", body = ClimateReading),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["climate"],
    operation_id = "createClimateReading"
)]
#[post("/climate-readings")]
pub async fn create_climate_reading(
    state: web::Data<HttpState>,
    payload: web::Json<ClimateReadingBody>,
) -> ApiResult<HttpResponse> {
    let reading =
        ClimateReading::from_draft(Uuid::new_v4(), payload.into_inner().into(), Utc::now());
    state
        .climate
        .insert(&reading)
        .await
        .map_err(map_climate_repository_error)?;
    Ok(HttpResponse::Created().json(reading))
}

/// Fetch a single climate reading.
#[utoipa::path(
    get,
    path = "/api/v1/climate-readings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Reading identifier")),
    responses(
        (status = 200, description = "The reading", body = ClimateReading),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown reading", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["climate"],
    operation_id = "getClimateReading"
)]
#[get("/climate-readings/{id}")]
pub async fn get_climate_reading(
    state: web::Data<HttpState>,
    path: web::Path<ClimateReadingPath>,
) -> ApiResult<web::Json<ClimateReading>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    Ok(web::Json(find_reading(&state, id).await?))
}

/// Replace a climate reading's measurements.
///
/// The original timestamp is kept; only the measured values change.
#[utoipa::path(
    put,
    path = "/api/v1/climate-readings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Reading identifier")),
    request_body = ClimateReadingBody,
    responses(
        (status = 200, description = "Reading replaced", body = ClimateReading),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown reading", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["climate"],
    operation_id = "updateClimateReading"
)]
#[put("/climate-readings/{id}")]
pub async fn update_climate_reading(
    state: web::Data<HttpState>,
    path: web::Path<ClimateReadingPath>,
    payload: web::Json<ClimateReadingBody>,
) -> ApiResult<web::Json<ClimateReading>> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let existing = find_reading(&state, id).await?;
    let updated =
        ClimateReading::from_draft(id, payload.into_inner().into(), existing.recorded_at);
    let found = state
        .climate
        .update(&updated)
        .await
        .map_err(map_climate_repository_error)?;
    if !found {
        return Err(Error::not_found(format!("climate reading {id} not found")));
    }
    Ok(web::Json(updated))
}

/// Delete a climate reading.
#[utoipa::path(
    delete,
    path = "/api/v1/climate-readings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Reading identifier")),
    responses(
        (status = 204, description = "Reading deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown reading", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["climate"],
    operation_id = "deleteClimateReading"
)]
#[delete("/climate-readings/{id}")]
pub async fn delete_climate_reading(
    state: web::Data<HttpState>,
    path: web::Path<ClimateReadingPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let found = state
        .climate
        .delete(&id)
        .await
        .map_err(map_climate_repository_error)?;
    if !found {
        return Err(Error::not_found(format!("climate reading {id} not found")));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "climate_tests.rs"]
mod tests;
