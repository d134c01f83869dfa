//! Product inventory entities.
//!
//! A product is a single ingredient held in stock: bread, cheese, a slice of
//! ham. Sandwiches are composed from products, and completing an order draws
//! the member products down from stock.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Portion size shared by products and sandwiches.
///
/// # Examples
/// ```
/// use kiosk_backend::domain::Size;
///
/// assert_eq!(Size::Xl.as_str(), "XL");
/// assert_eq!("M".parse::<Size>(), Ok(Size::M));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    /// Small.
    S,
    /// Medium.
    M,
    /// Large.
    L,
    /// Extra large.
    #[serde(rename = "XL")]
    Xl,
}

impl Size {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown size string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown size: {}", self.input)
    }
}

impl std::error::Error for ParseSizeError {}

impl std::str::FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::Xl),
            other => Err(ParseSizeError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Display colour used by the kiosk front-of-house screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Colour {
    /// Yellow label.
    Yellow,
    /// Red label.
    Red,
    /// Green label.
    Green,
    /// Blue label.
    Blue,
}

impl Colour {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown colour string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColourError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseColourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown colour: {}", self.input)
    }
}

impl std::error::Error for ParseColourError {}

impl std::str::FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            other => Err(ParseColourError {
                input: other.to_owned(),
            }),
        }
    }
}

/// A stocked ingredient.
///
/// Weights are whole grams. `quantity_in_stock` never goes negative; the
/// order-completion path refuses to draw stock below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Portion size.
    pub size: Size,
    /// Unit weight in grams.
    pub weight_grams: i32,
    /// Label colour on the kiosk screens.
    pub colour: Colour,
    /// Units currently in stock.
    pub quantity_in_stock: i32,
    /// Seconds on the grill, if this ingredient needs cooking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_seconds: Option<i32>,
}

/// Input payload for creating or replacing a [`Product`].
///
/// Field validation happens at the HTTP boundary; drafts reaching the domain
/// services already satisfy the numeric and naming constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Unique display name.
    pub name: String,
    /// Portion size.
    pub size: Size,
    /// Unit weight in grams.
    pub weight_grams: i32,
    /// Label colour on the kiosk screens.
    pub colour: Colour,
    /// Units initially in stock.
    pub quantity_in_stock: i32,
    /// Seconds on the grill, if this ingredient needs cooking.
    pub cook_time_seconds: Option<i32>,
}

impl Product {
    /// Materialise a draft under a fresh identifier.
    pub fn from_draft(id: Uuid, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            size: draft.size,
            weight_grams: draft.weight_grams,
            colour: draft.colour,
            quantity_in_stock: draft.quantity_in_stock,
            cook_time_seconds: draft.cook_time_seconds,
        }
    }
}
