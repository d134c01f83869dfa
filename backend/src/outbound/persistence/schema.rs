//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When a migration changes the schema, update this file to
//! match (or regenerate it with `diesel print-schema`).

diesel::table! {
    /// Product inventory.
    ///
    /// One row per stocked ingredient. Size and colour are stored as their
    /// CHECK-constrained string forms.
    products (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique display name.
        name -> Varchar,
        /// Portion size string (S, M, L, XL).
        size -> Varchar,
        /// Label colour string (yellow, red, green, blue).
        colour -> Varchar,
        /// Unit weight in grams.
        weight_grams -> Int4,
        /// Units currently in stock; constrained non-negative.
        quantity_in_stock -> Int4,
        /// Seconds on the grill, when the ingredient needs cooking.
        cook_time_seconds -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Sandwich menu.
    ///
    /// Totals are derived from the membership rows and stored so the API can
    /// serve them without joining; the service layer recomputes them on any
    /// membership change.
    sandwiches (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique display name.
        name -> Varchar,
        /// Portion size string (S, M, L, XL).
        size -> Varchar,
        /// Sum of member product weights, in grams.
        weight_total_grams -> Int4,
        /// Maximum member cook time, in seconds.
        cook_time_seconds -> Int4,
    }
}

diesel::table! {
    /// Sandwich membership join table.
    ///
    /// `position` preserves menu order within a sandwich.
    sandwich_products (sandwich_id, product_id) {
        /// Owning sandwich.
        sandwich_id -> Uuid,
        /// Member product.
        product_id -> Uuid,
        /// Zero-based menu position within the sandwich.
        position -> Int4,
    }
}

diesel::table! {
    /// Customer orders.
    orders (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The ordered sandwich; deletion is restricted while referenced.
        sandwich_id -> Uuid,
        /// Number of sandwiches ordered.
        quantity -> Int4,
        /// Sandwich weight times quantity, in grams.
        weight_total_grams -> Int4,
        /// Sandwich cook time times quantity, in seconds.
        cook_time_total_seconds -> Int4,
        /// Workflow status string (pending, ticket-printed, validated,
        /// cooking, done).
        status -> Varchar,
        /// Ticket barcode; unique among the orders that carry one.
        barcode -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ambient sensor log.
    climate_readings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Moment the reading was taken.
        recorded_at -> Timestamptz,
        /// Temperature in degrees Celsius.
        temperature_celsius -> Float8,
        /// Relative humidity percentage.
        humidity_percent -> Float8,
    }
}

diesel::table! {
    /// Scale scan log.
    scans (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Scanned barcode text.
        code -> Varchar,
        /// Measured weight in grams.
        weight_grams -> Int4,
        /// Moment the scan was taken.
        scanned_at -> Timestamptz,
    }
}

diesel::joinable!(orders -> sandwiches (sandwich_id));
diesel::joinable!(sandwich_products -> sandwiches (sandwich_id));
diesel::joinable!(sandwich_products -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    climate_readings,
    orders,
    products,
    sandwich_products,
    sandwiches,
    scans,
);
