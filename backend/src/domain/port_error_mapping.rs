//! Shared mapping from repository port failures to domain errors.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{
    ClimateReadingRepositoryError, OrderRepositoryError, ProductRepositoryError,
    SandwichRepositoryError, ScanRepositoryError,
};

pub(crate) fn map_product_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
        ProductRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("product name already in use: {name}"))
                .with_details(json!({ "field": "name", "code": "duplicate" }))
        }
    }
}

pub(crate) fn map_sandwich_repository_error(error: SandwichRepositoryError) -> Error {
    match error {
        SandwichRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sandwich repository unavailable: {message}"))
        }
        SandwichRepositoryError::Query { message } => {
            Error::internal(format!("sandwich repository error: {message}"))
        }
        SandwichRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("sandwich name already in use: {name}"))
                .with_details(json!({ "field": "name", "code": "duplicate" }))
        }
        SandwichRepositoryError::Referenced => {
            Error::conflict("sandwich is referenced by existing orders")
                .with_details(json!({ "code": "referenced" }))
        }
    }
}

pub(crate) fn map_order_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderRepositoryError::DuplicateBarcode { barcode } => {
            Error::conflict(format!("order barcode already in use: {barcode}"))
                .with_details(json!({ "field": "barcode", "code": "duplicate" }))
        }
        OrderRepositoryError::InsufficientStock { product } => {
            Error::conflict(format!("insufficient stock for product: {product}"))
                .with_details(json!({ "product": product, "code": "insufficient_stock" }))
        }
    }
}

pub(crate) fn map_climate_repository_error(error: ClimateReadingRepositoryError) -> Error {
    match error {
        ClimateReadingRepositoryError::Connection { message } => Error::service_unavailable(
            format!("climate reading repository unavailable: {message}"),
        ),
        ClimateReadingRepositoryError::Query { message } => {
            Error::internal(format!("climate reading repository error: {message}"))
        }
    }
}

pub(crate) fn map_scan_repository_error(error: ScanRepositoryError) -> Error {
    match error {
        ScanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("scan repository unavailable: {message}"))
        }
        ScanRepositoryError::Query { message } => {
            Error::internal(format!("scan repository error: {message}"))
        }
    }
}
