//! PostgreSQL-backed [`SnapshotStore`].

use async_trait::async_trait;
use gamedash_core::error::StoreError;
use gamedash_core::snapshot::{DashboardSnapshot, UpsertDashboardSnapshot};
use gamedash_core::store::SnapshotStore;

use crate::repositories::DashboardSnapshotRepo;
use crate::DbPool;

/// Snapshot store over the `dashboard_snapshots` table.
///
/// Uniqueness of `user_id` is enforced by `uq_dashboard_snapshots_user_id`;
/// inserts resolve conflicts with `ON CONFLICT ... DO UPDATE`.
#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: DbPool,
}

impl PgSnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<DashboardSnapshot>, StoreError> {
        let row = DashboardSnapshotRepo::find_by_user_id(&self.pool, user_id)
            .await
            .map_err(StoreError::new)?;
        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<DashboardSnapshot>, StoreError> {
        let rows = DashboardSnapshotRepo::list(&self.pool)
            .await
            .map_err(StoreError::new)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save(
        &self,
        input: &UpsertDashboardSnapshot,
    ) -> Result<DashboardSnapshot, StoreError> {
        if let Some(id) = input.id {
            let updated = DashboardSnapshotRepo::update_by_id(&self.pool, id, input)
                .await
                .map_err(StoreError::new)?;
            if let Some(row) = updated {
                return Ok(row.into());
            }
            // Deleted (or replaced) since it was loaded.
            tracing::debug!(
                snapshot_id = id,
                user_id = %input.user_id,
                "Snapshot vanished before update, inserting"
            );
        }

        let row = DashboardSnapshotRepo::upsert(&self.pool, input)
            .await
            .map_err(StoreError::new)?;
        Ok(row.into())
    }

    async fn delete_by_user_id(&self, user_id: &str) -> Result<bool, StoreError> {
        DashboardSnapshotRepo::delete_by_user_id(&self.pool, user_id)
            .await
            .map_err(StoreError::new)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}
