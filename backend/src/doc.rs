//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (products, stock,
//!   sandwiches, orders, climate readings, scans, health)
//! - **Schemas**: Domain payload types and the request bodies accepted by
//!   the handlers
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{
    ClimateReading, Colour, Error, ErrorCode, Order, OrderStatus, Product, Sandwich, Scan, Size,
    StockLevel, StockSnapshot,
};
use crate::inbound::http::climate::ClimateReadingBody;
use crate::inbound::http::orders::{ChangeStatusBody, OrderBody, VerifyWeightBody};
use crate::inbound::http::products::{AddStockBody, ProductBody};
use crate::inbound::http::sandwiches::SandwichBody;
use crate::inbound::http::scans::ScanBody;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sandwich kiosk backend API",
        description = "HTTP interface for inventory, sandwich composition, order processing, \
                       and telemetry capture.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::add_stock,
        crate::inbound::http::products::current_stock,
        crate::inbound::http::sandwiches::list_sandwiches,
        crate::inbound::http::sandwiches::create_sandwich,
        crate::inbound::http::sandwiches::get_sandwich,
        crate::inbound::http::sandwiches::update_sandwich,
        crate::inbound::http::sandwiches::delete_sandwich,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::orders::change_status,
        crate::inbound::http::orders::verify_weight,
        crate::inbound::http::climate::list_climate_readings,
        crate::inbound::http::climate::create_climate_reading,
        crate::inbound::http::climate::get_climate_reading,
        crate::inbound::http::climate::update_climate_reading,
        crate::inbound::http::climate::delete_climate_reading,
        crate::inbound::http::scans::list_scans,
        crate::inbound::http::scans::create_scan,
        crate::inbound::http::scans::get_scan,
        crate::inbound::http::scans::update_scan,
        crate::inbound::http::scans::delete_scan,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Product,
        Size,
        Colour,
        Sandwich,
        Order,
        OrderStatus,
        ClimateReading,
        Scan,
        StockSnapshot,
        StockLevel,
        ProductBody,
        AddStockBody,
        SandwichBody,
        OrderBody,
        ChangeStatusBody,
        VerifyWeightBody,
        ClimateReadingBody,
        ScanBody,
    )),
    tags(
        (name = "products", description = "Inventory product management"),
        (name = "stock", description = "Aggregated stock levels"),
        (name = "sandwiches", description = "Sandwich composition and derived totals"),
        (name = "orders", description = "Order lifecycle and weight verification"),
        (name = "climate", description = "Ambient climate telemetry"),
        (name = "scans", description = "Barcode scan capture"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
