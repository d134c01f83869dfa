//! Port for climate reading persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ClimateReading;

use super::define_port_error;

define_port_error! {
    /// Errors raised by climate reading repository adapters.
    pub enum ClimateReadingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "climate reading repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "climate reading repository query failed: {message}",
    }
}

/// Port for the climate reading log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClimateReadingRepository: Send + Sync {
    /// List all readings, newest first.
    async fn list(&self) -> Result<Vec<ClimateReading>, ClimateReadingRepositoryError>;

    /// Find a reading by id.
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<ClimateReading>, ClimateReadingRepositoryError>;

    /// Persist a new reading.
    async fn insert(&self, reading: &ClimateReading) -> Result<(), ClimateReadingRepositoryError>;

    /// Replace an existing reading. Returns `false` when the id is unknown.
    async fn update(&self, reading: &ClimateReading)
        -> Result<bool, ClimateReadingRepositoryError>;

    /// Delete a reading. Returns `false` when the id is unknown.
    async fn delete(&self, id: &Uuid) -> Result<bool, ClimateReadingRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn connection_error_formats_message() {
        let err = ClimateReadingRepositoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
