//! PostgreSQL-backed `ClimateReadingRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ClimateReading;
use crate::domain::ports::{ClimateReadingRepository, ClimateReadingRepositoryError};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{ClimateReadingRow, ClimateReadingUpdate, NewClimateReadingRow};
use super::pool::{DbPool, PoolError};
use super::schema::climate_readings;

/// Diesel-backed implementation of the climate reading repository port.
#[derive(Clone)]
pub struct DieselClimateReadingRepository {
    pool: DbPool,
}

impl DieselClimateReadingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClimateReadingRepositoryError {
    map_pool_error_with(error, |message| {
        ClimateReadingRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ClimateReadingRepositoryError {
    map_diesel_error_with(
        error,
        ClimateReadingRepositoryError::query,
        ClimateReadingRepositoryError::connection,
    )
}

#[async_trait]
impl ClimateReadingRepository for DieselClimateReadingRepository {
    async fn list(&self) -> Result<Vec<ClimateReading>, ClimateReadingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ClimateReadingRow> = climate_readings::table
            .order((climate_readings::recorded_at.desc(), climate_readings::id.desc()))
            .select(ClimateReadingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(ClimateReadingRow::into_domain).collect())
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<ClimateReading>, ClimateReadingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = climate_readings::table
            .filter(climate_readings::id.eq(id))
            .select(ClimateReadingRow::as_select())
            .first::<ClimateReadingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(ClimateReadingRow::into_domain))
    }

    async fn insert(&self, reading: &ClimateReading) -> Result<(), ClimateReadingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewClimateReadingRow {
            id: reading.id,
            recorded_at: reading.recorded_at,
            temperature_celsius: reading.temperature_celsius,
            humidity_percent: reading.humidity_percent,
        };

        diesel::insert_into(climate_readings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        reading: &ClimateReading,
    ) -> Result<bool, ClimateReadingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ClimateReadingUpdate {
            recorded_at: reading.recorded_at,
            temperature_celsius: reading.temperature_celsius,
            humidity_percent: reading.humidity_percent,
        };

        let updated = diesel::update(climate_readings::table.filter(climate_readings::id.eq(reading.id)))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ClimateReadingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(climate_readings::table.filter(climate_readings::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            ClimateReadingRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(
            repo_err,
            ClimateReadingRepositoryError::Query { .. }
        ));
        assert!(repo_err.to_string().contains("record not found"));
    }
}
