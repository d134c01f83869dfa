//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod climate;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod sandwiches;
pub mod scans;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
