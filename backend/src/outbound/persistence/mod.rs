//! Persistence adapters for the repository ports.
//!
//! The PostgreSQL adapters use Diesel with async support through
//! `diesel-async` and `bb8` connection pooling; the in-memory store backs
//! deployments without a database and the HTTP-level tests.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to the
//!   repository port error types, with constraint violations surfaced as
//!   their domain meaning (duplicate name, referenced sandwich, shortfall).
//!
//! # Example
//!
//! ```ignore
//! use kiosk_backend::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/kiosk");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselProductRepository::new(pool);
//! ```

mod diesel_climate_reading_repository;
mod diesel_error_mapping;
mod diesel_order_repository;
mod diesel_product_repository;
mod diesel_sandwich_repository;
mod diesel_scan_repository;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_climate_reading_repository::DieselClimateReadingRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_sandwich_repository::DieselSandwichRepository;
pub use diesel_scan_repository::DieselScanRepository;
pub use memory::MemoryRepositories;
pub use pool::{DbPool, PoolConfig, PoolError};
