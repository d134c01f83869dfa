//! Ambient climate readings logged by the kiosk sensor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A timestamped temperature and humidity reading. Pure log data; nothing
/// derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClimateReading {
    /// Unique reading identifier.
    pub id: Uuid,
    /// When the reading was taken.
    pub recorded_at: DateTime<Utc>,
    /// Temperature in degrees Celsius.
    pub temperature_celsius: f64,
    /// Relative humidity percentage.
    pub humidity_percent: f64,
}

/// Input payload for logging a [`ClimateReading`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateReadingDraft {
    /// Temperature in degrees Celsius.
    pub temperature_celsius: f64,
    /// Relative humidity percentage.
    pub humidity_percent: f64,
}

impl ClimateReading {
    /// Materialise a draft with a server-assigned id and timestamp.
    pub fn from_draft(id: Uuid, draft: ClimateReadingDraft, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            recorded_at,
            temperature_celsius: draft.temperature_celsius,
            humidity_percent: draft.humidity_percent,
        }
    }
}
