//! Order lifecycle entities.
//!
//! An order references one sandwich in some quantity. Its weight and cook
//! time totals are recomputed from the sandwich on every save, and stock is
//! drawn down exactly once, at the moment the order first transitions into
//! [`OrderStatus::Done`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::sandwich::Sandwich;

/// Acceptable gap between the measured and computed order weight, in grams.
///
/// The scale at the hatch weighs the finished order; a reading within this
/// tolerance of the stored total confirms the order, anything else sends it
/// back to the queue.
pub const WEIGHT_TOLERANCE_GRAMS: i32 = 5;

/// Kitchen workflow state of an order.
///
/// The workflow normally advances pending, ticket-printed, validated,
/// cooking, done, but no linear progression is enforced; weight verification
/// legitimately moves orders back to pending.
///
/// # Examples
/// ```
/// use kiosk_backend::domain::OrderStatus;
///
/// assert_eq!(OrderStatus::TicketPrinted.as_str(), "ticket-printed");
/// assert_eq!("done".parse::<OrderStatus>(), Ok(OrderStatus::Done));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Waiting for the kitchen to pick the order up.
    #[default]
    Pending,
    /// The kitchen ticket has been printed.
    TicketPrinted,
    /// A staff member has validated the ticket.
    Validated,
    /// On the grill.
    Cooking,
    /// Ready for hand-over; stock has been drawn down.
    Done,
}

impl OrderStatus {
    /// Every status, in workflow order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::TicketPrinted,
        OrderStatus::Validated,
        OrderStatus::Cooking,
        OrderStatus::Done,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::TicketPrinted => "ticket-printed",
            Self::Validated => "validated",
            Self::Cooking => "cooking",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrderStatusError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseOrderStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown order status: {}", self.input)
    }
}

impl std::error::Error for ParseOrderStatusError {}

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ticket-printed" => Ok(Self::TicketPrinted),
            "validated" => Ok(Self::Validated),
            "cooking" => Ok(Self::Cooking),
            "done" => Ok(Self::Done),
            other => Err(ParseOrderStatusError {
                input: other.to_owned(),
            }),
        }
    }
}

/// An order for a quantity of one sandwich.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: Uuid,
    /// The ordered sandwich.
    pub sandwich_id: Uuid,
    /// Number of sandwiches ordered.
    pub quantity: i32,
    /// Sandwich weight times quantity, in grams.
    pub weight_total_grams: i32,
    /// Sandwich cook time times quantity, in seconds.
    pub cook_time_total_seconds: i32,
    /// Kitchen workflow state.
    pub status: OrderStatus,
    /// Barcode printed on the ticket, if one was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input payload for creating or replacing an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// The ordered sandwich.
    pub sandwich_id: Uuid,
    /// Number of sandwiches ordered.
    pub quantity: i32,
    /// Initial workflow state; defaults to pending.
    pub status: OrderStatus,
    /// Barcode printed on the ticket, if one was issued.
    pub barcode: Option<String>,
}

impl Order {
    /// Materialise a draft against its resolved sandwich.
    ///
    /// The totals are derived here from the sandwich's current totals; the
    /// caller supplies the creation timestamp.
    pub fn from_draft(
        id: Uuid,
        draft: OrderDraft,
        sandwich: &Sandwich,
        created_at: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let (weight_total_grams, cook_time_total_seconds) =
            order_totals(sandwich, draft.quantity)?;
        Ok(Self {
            id,
            sandwich_id: sandwich.id,
            quantity: draft.quantity,
            weight_total_grams,
            cook_time_total_seconds,
            status: draft.status,
            barcode: draft.barcode,
            created_at,
        })
    }

    /// Recompute the stored totals against the sandwich's current totals.
    pub fn refresh_totals(&mut self, sandwich: &Sandwich) -> Result<(), Error> {
        let (weight, cook_time) = order_totals(sandwich, self.quantity)?;
        self.weight_total_grams = weight;
        self.cook_time_total_seconds = cook_time;
        Ok(())
    }

    /// Whether moving to `next` must draw down stock.
    ///
    /// True only when entering done from a non-done state. Orders created
    /// directly in done and repeated saves of a done order never trigger a
    /// second draw-down.
    pub fn completes_with(&self, next: OrderStatus) -> bool {
        self.status != OrderStatus::Done && next == OrderStatus::Done
    }

    /// Whether a scale reading confirms this order's weight.
    pub fn weight_matches(&self, measured_grams: i32) -> bool {
        (measured_grams - self.weight_total_grams).abs() <= WEIGHT_TOLERANCE_GRAMS
    }
}

/// Derive an order's weight and cook-time totals from its sandwich.
///
/// Totals are stored as `i32`; a quantity large enough to overflow either
/// total rejects the order instead of wrapping.
pub fn order_totals(sandwich: &Sandwich, quantity: i32) -> Result<(i32, i32), Error> {
    let weight = sandwich.weight_total_grams.checked_mul(quantity);
    let cook_time = sandwich.cook_time_seconds.checked_mul(quantity);
    match (weight, cook_time) {
        (Some(weight), Some(cook_time)) => Ok((weight, cook_time)),
        _ => Err(
            Error::invalid_request("quantity is too large for this sandwich").with_details(
                json!({
                    "field": "quantity",
                    "value": quantity.to_string(),
                    "code": "out_of_range",
                }),
            ),
        ),
    }
}
