//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations. Enum-valued columns (size,
//! colour, order status) are stored as text and parsed back through the
//! domain `FromStr` impls when rows are decoded.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{ClimateReading, Colour, Order, OrderStatus, Product, Sandwich, Scan, Size};

use super::schema::{climate_readings, orders, products, sandwich_products, sandwiches, scans};

// ---------------------------------------------------------------------------
// Product models
// ---------------------------------------------------------------------------

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub size: String,
    pub colour: String,
    pub weight_grams: i32,
    pub quantity_in_stock: i32,
    pub cook_time_seconds: Option<i32>,
}

impl ProductRow {
    /// Decodes the row into a domain product, parsing the stored enum text.
    pub(crate) fn into_domain(self) -> Result<Product, String> {
        let size: Size = self
            .size
            .parse()
            .map_err(|_| format!("unknown size: {}", self.size))?;
        let colour: Colour = self
            .colour
            .parse()
            .map_err(|_| format!("unknown colour: {}", self.colour))?;
        Ok(Product {
            id: self.id,
            name: self.name,
            size,
            weight_grams: self.weight_grams,
            colour,
            quantity_in_stock: self.quantity_in_stock,
            cook_time_seconds: self.cook_time_seconds,
        })
    }
}

/// Insertable struct for creating new product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub size: &'a str,
    pub colour: &'a str,
    pub weight_grams: i32,
    pub quantity_in_stock: i32,
    pub cook_time_seconds: Option<i32>,
}

/// Changeset struct for updating existing product records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductUpdate<'a> {
    pub name: &'a str,
    pub size: &'a str,
    pub colour: &'a str,
    pub weight_grams: i32,
    pub quantity_in_stock: i32,
    pub cook_time_seconds: Option<i32>,
}

// ---------------------------------------------------------------------------
// Sandwich models
// ---------------------------------------------------------------------------

/// Row struct for reading from the sandwiches table. Member products are
/// loaded separately from sandwich_products and attached during decode.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sandwiches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SandwichRow {
    pub id: Uuid,
    pub name: String,
    pub size: String,
    pub weight_total_grams: i32,
    pub cook_time_seconds: i32,
}

impl SandwichRow {
    /// Decodes the row plus its member products into a domain sandwich.
    pub(crate) fn into_domain(self, products: Vec<Product>) -> Result<Sandwich, String> {
        let size: Size = self
            .size
            .parse()
            .map_err(|_| format!("unknown size: {}", self.size))?;
        Ok(Sandwich {
            id: self.id,
            name: self.name,
            size,
            products,
            weight_total_grams: self.weight_total_grams,
            cook_time_seconds: self.cook_time_seconds,
        })
    }
}

/// Insertable struct for creating new sandwich records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sandwiches)]
pub(crate) struct NewSandwichRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub size: &'a str,
    pub weight_total_grams: i32,
    pub cook_time_seconds: i32,
}

/// Changeset struct for updating existing sandwich records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sandwiches)]
pub(crate) struct SandwichUpdate<'a> {
    pub name: &'a str,
    pub size: &'a str,
    pub weight_total_grams: i32,
    pub cook_time_seconds: i32,
}

/// Insertable struct linking a sandwich to one member product. `position`
/// preserves the order products were listed in when the sandwich was
/// composed.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sandwich_products)]
pub(crate) struct NewSandwichProductRow {
    pub sandwich_id: Uuid,
    pub product_id: Uuid,
    pub position: i32,
}

// ---------------------------------------------------------------------------
// Order models
// ---------------------------------------------------------------------------

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub sandwich_id: Uuid,
    pub quantity: i32,
    pub weight_total_grams: i32,
    pub cook_time_total_seconds: i32,
    pub status: String,
    pub barcode: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    /// Decodes the row into a domain order, parsing the stored status text.
    pub(crate) fn into_domain(self) -> Result<Order, String> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|_| format!("unknown order status: {}", self.status))?;
        Ok(Order {
            id: self.id,
            sandwich_id: self.sandwich_id,
            quantity: self.quantity,
            weight_total_grams: self.weight_total_grams,
            cook_time_total_seconds: self.cook_time_total_seconds,
            status,
            barcode: self.barcode,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating new order records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub sandwich_id: Uuid,
    pub quantity: i32,
    pub weight_total_grams: i32,
    pub cook_time_total_seconds: i32,
    pub status: &'a str,
    pub barcode: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for updating existing order records. `created_at` is
/// fixed at insert and never rewritten. The nested option lets an update
/// clear a previously stored barcode rather than leave it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
pub(crate) struct OrderUpdate<'a> {
    pub sandwich_id: Uuid,
    pub quantity: i32,
    pub weight_total_grams: i32,
    pub cook_time_total_seconds: i32,
    pub status: &'a str,
    pub barcode: Option<Option<&'a str>>,
}

// ---------------------------------------------------------------------------
// Climate reading models
// ---------------------------------------------------------------------------

/// Row struct for reading from the climate_readings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = climate_readings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClimateReadingRow {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

impl ClimateReadingRow {
    pub(crate) fn into_domain(self) -> ClimateReading {
        ClimateReading {
            id: self.id,
            recorded_at: self.recorded_at,
            temperature_celsius: self.temperature_celsius,
            humidity_percent: self.humidity_percent,
        }
    }
}

/// Insertable struct for creating new climate reading records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = climate_readings)]
pub(crate) struct NewClimateReadingRow {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

/// Changeset struct for updating existing climate reading records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = climate_readings)]
pub(crate) struct ClimateReadingUpdate {
    pub recorded_at: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

// ---------------------------------------------------------------------------
// Scan models
// ---------------------------------------------------------------------------

/// Row struct for reading from the scans table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScanRow {
    pub id: Uuid,
    pub code: String,
    pub weight_grams: i32,
    pub scanned_at: DateTime<Utc>,
}

impl ScanRow {
    pub(crate) fn into_domain(self) -> Scan {
        Scan {
            id: self.id,
            code: self.code,
            weight_grams: self.weight_grams,
            scanned_at: self.scanned_at,
        }
    }
}

/// Insertable struct for creating new scan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scans)]
pub(crate) struct NewScanRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub weight_grams: i32,
    pub scanned_at: DateTime<Utc>,
}

/// Changeset struct for updating existing scan records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scans)]
pub(crate) struct ScanUpdate<'a> {
    pub code: &'a str,
    pub weight_grams: i32,
    pub scanned_at: DateTime<Utc>,
}
