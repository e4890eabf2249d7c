//! Dashboard snapshot row model.

use gamedash_core::snapshot::DashboardSnapshot;
use gamedash_core::types::{DbId, Timestamp};
use gamedash_core::upstream::{DownloadSummary, GameSummary};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `dashboard_snapshots` table.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardSnapshotRow {
    pub id: DbId,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub balance: Decimal,
    pub games: Json<Vec<GameSummary>>,
    pub downloads: Json<Vec<DownloadSummary>>,
    pub last_updated_at: Timestamp,
}

impl From<DashboardSnapshotRow> for DashboardSnapshot {
    fn from(row: DashboardSnapshotRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            balance: row.balance,
            games: row.games.0,
            downloads: row.downloads.0,
            last_updated_at: row.last_updated_at,
        }
    }
}
