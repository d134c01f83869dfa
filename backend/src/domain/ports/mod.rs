//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod climate_reading_repository;
mod order_repository;
mod product_repository;
mod sandwich_repository;
mod scan_repository;
mod stock_publisher;

#[cfg(test)]
pub use climate_reading_repository::MockClimateReadingRepository;
pub use climate_reading_repository::{ClimateReadingRepository, ClimateReadingRepositoryError};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use sandwich_repository::MockSandwichRepository;
pub use sandwich_repository::{SandwichRepository, SandwichRepositoryError};
#[cfg(test)]
pub use scan_repository::MockScanRepository;
pub use scan_repository::{ScanRepository, ScanRepositoryError};
#[cfg(test)]
pub use stock_publisher::MockStockPublisher;
pub use stock_publisher::StockPublisher;
