//! Scale scans logged by the weighing station.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A code and weight pair reported by the scale. Pure log data; weight
/// verification runs against orders, not against scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    /// Unique scan identifier.
    pub id: Uuid,
    /// The scanned code, typically an order barcode.
    pub code: String,
    /// Measured weight in grams.
    pub weight_grams: i32,
    /// When the scan was taken.
    pub scanned_at: DateTime<Utc>,
}

/// Input payload for logging a [`Scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDraft {
    /// The scanned code.
    pub code: String,
    /// Measured weight in grams.
    pub weight_grams: i32,
}

impl Scan {
    /// Materialise a draft with a server-assigned id and timestamp.
    pub fn from_draft(id: Uuid, draft: ScanDraft, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code: draft.code,
            weight_grams: draft.weight_grams,
            scanned_at,
        }
    }
}
