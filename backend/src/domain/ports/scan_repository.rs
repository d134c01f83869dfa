//! Port for barcode scan persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Scan;

use super::define_port_error;

define_port_error! {
    /// Errors raised by scan repository adapters.
    pub enum ScanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "scan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "scan repository query failed: {message}",
    }
}

/// Port for the scan log captured at the weigh station.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// List all scans, newest first.
    async fn list(&self) -> Result<Vec<Scan>, ScanRepositoryError>;

    /// Find a scan by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Scan>, ScanRepositoryError>;

    /// Persist a new scan.
    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError>;

    /// Replace an existing scan. Returns `false` when the id is unknown.
    async fn update(&self, scan: &Scan) -> Result<bool, ScanRepositoryError>;

    /// Delete a scan. Returns `false` when the id is unknown.
    async fn delete(&self, id: &Uuid) -> Result<bool, ScanRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn query_error_formats_message() {
        let err = ScanRepositoryError::query("syntax error");
        assert!(err.to_string().contains("syntax error"));
    }
}
