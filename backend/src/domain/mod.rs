//! Domain entities, ports, and services.
//!
//! Purpose: define the strongly typed model of the kiosk (products,
//! sandwiches, orders, sensor logs) together with the driving and driven
//! ports around it. Invariants and serialisation contracts (serde) are
//! documented in each type's Rustdoc.
//!
//! Derived fields never go stale: sandwich totals are recomputed on every
//! membership change and order totals on every save. Stock is drawn down
//! exactly once per order, when it first enters the done state.

mod climate;
mod error;
mod order;
mod order_desk;
mod port_error_mapping;
pub mod ports;
mod product;
mod product_catalog;
mod sandwich;
mod sandwich_menu;
mod scan;
mod stock;
mod trace_id;

pub use self::climate::{ClimateReading, ClimateReadingDraft};
pub use self::error::{Error, ErrorCode};
pub use self::order::{
    Order, OrderDraft, OrderStatus, ParseOrderStatusError, WEIGHT_TOLERANCE_GRAMS, order_totals,
};
#[cfg(test)]
pub use self::order_desk::MockOrderDesk;
pub use self::order_desk::{OrderDesk, OrderDeskService};
pub(crate) use self::port_error_mapping::{
    map_climate_repository_error, map_scan_repository_error,
};
pub use self::product::{Colour, ParseColourError, ParseSizeError, Product, ProductDraft, Size};
#[cfg(test)]
pub use self::product_catalog::MockProductCatalog;
pub use self::product_catalog::{ProductCatalog, ProductCatalogService};
pub use self::sandwich::{Sandwich, SandwichDraft, derive_totals};
#[cfg(test)]
pub use self::sandwich_menu::MockSandwichMenu;
pub use self::sandwich_menu::{SandwichMenu, SandwichMenuService};
pub use self::scan::{Scan, ScanDraft};
pub use self::stock::{StockDebit, StockLevel, StockSnapshot};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for fallible domain operations.
///
/// # Examples
/// ```
/// use kiosk_backend::domain::{ApiResult, Error};
///
/// fn guard(quantity: i32) -> ApiResult<i32> {
///     if quantity < 1 {
///         return Err(Error::invalid_request("quantity must be positive"));
///     }
///     Ok(quantity)
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
