//! PostgreSQL-backed `ScanRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Scan;
use crate::domain::ports::{ScanRepository, ScanRepositoryError};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{NewScanRow, ScanRow, ScanUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::scans;

/// Diesel-backed implementation of the scan repository port.
#[derive(Clone)]
pub struct DieselScanRepository {
    pool: DbPool,
}

impl DieselScanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScanRepositoryError {
    map_pool_error_with(error, |message| ScanRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ScanRepositoryError {
    map_diesel_error_with(
        error,
        ScanRepositoryError::query,
        ScanRepositoryError::connection,
    )
}

#[async_trait]
impl ScanRepository for DieselScanRepository {
    async fn list(&self) -> Result<Vec<Scan>, ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ScanRow> = scans::table
            .order((scans::scanned_at.desc(), scans::id.desc()))
            .select(ScanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(ScanRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Scan>, ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = scans::table
            .filter(scans::id.eq(id))
            .select(ScanRow::as_select())
            .first::<ScanRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(ScanRow::into_domain))
    }

    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewScanRow {
            id: scan.id,
            code: &scan.code,
            weight_grams: scan.weight_grams,
            scanned_at: scan.scanned_at,
        };

        diesel::insert_into(scans::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, scan: &Scan) -> Result<bool, ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ScanUpdate {
            code: &scan.code,
            weight_grams: scan.weight_grams,
            scanned_at: scan.scanned_at,
        };

        let updated = diesel::update(scans::table.filter(scans::id.eq(scan.id)))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(scans::table.filter(scans::id.eq(id)))
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

        assert!(matches!(repo_err, ScanRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, ScanRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }
}
