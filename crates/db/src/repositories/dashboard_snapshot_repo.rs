//! Repository for the `dashboard_snapshots` table.

use gamedash_core::snapshot::UpsertDashboardSnapshot;
use gamedash_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dashboard_snapshot::DashboardSnapshotRow;

/// Column list for dashboard_snapshots queries.
const COLUMNS: &str =
    "id, user_id, username, email, balance, games, downloads, last_updated_at";

/// Provides data access for cached dashboard snapshots.
pub struct DashboardSnapshotRepo;

impl DashboardSnapshotRepo {
    /// Find the snapshot for a single user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<DashboardSnapshotRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_snapshots WHERE user_id = $1");
        sqlx::query_as::<_, DashboardSnapshotRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List every snapshot ordered by user id.
    pub async fn list(pool: &PgPool) -> Result<Vec<DashboardSnapshotRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_snapshots ORDER BY user_id ASC");
        sqlx::query_as::<_, DashboardSnapshotRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert a snapshot. If a row for the same user already exists it is
    /// overwritten in place and keeps its id.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertDashboardSnapshot,
    ) -> Result<DashboardSnapshotRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_snapshots
                (user_id, username, email, balance, games, downloads, last_updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                balance = EXCLUDED.balance,
                games = EXCLUDED.games,
                downloads = EXCLUDED.downloads,
                last_updated_at = EXCLUDED.last_updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardSnapshotRow>(&query)
            .bind(&input.user_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.balance)
            .bind(Json(&input.games))
            .bind(Json(&input.downloads))
            .bind(input.last_updated_at)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the snapshot with the given id. Returns `None` if no row
    /// with that id exists for `input.user_id`.
    pub async fn update_by_id(
        pool: &PgPool,
        id: DbId,
        input: &UpsertDashboardSnapshot,
    ) -> Result<Option<DashboardSnapshotRow>, sqlx::Error> {
        let query = format!(
            "UPDATE dashboard_snapshots SET
                username = $3,
                email = $4,
                balance = $5,
                games = $6,
                downloads = $7,
                last_updated_at = $8
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardSnapshotRow>(&query)
            .bind(id)
            .bind(&input.user_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.balance)
            .bind(Json(&input.games))
            .bind(Json(&input.downloads))
            .bind(input.last_updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete the snapshot for a user. Returns `true` if a row was deleted.
    pub async fn delete_by_user_id(pool: &PgPool, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dashboard_snapshots WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
