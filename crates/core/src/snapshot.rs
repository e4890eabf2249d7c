//! Dashboard snapshot entity and the pure merge step.
//!
//! A snapshot is the denormalized, persisted view of one user's dashboard.
//! Merging never mutates a loaded record: [`build_snapshot`] takes the
//! existing snapshot (if any) plus the three upstream results and produces a
//! fresh [`UpsertDashboardSnapshot`] value for the store to write.

use chrono::SubsecRound;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{DbId, Timestamp};
use crate::upstream::{DownloadSummary, GameSummary, UserDetails};

/// Timestamps are kept at microsecond precision, matching `TIMESTAMPTZ`.
const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

/// A persisted dashboard snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub id: DbId,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub balance: Decimal,
    pub games: Vec<GameSummary>,
    pub downloads: Vec<DownloadSummary>,
    pub last_updated_at: Timestamp,
}

/// Input for [`SnapshotStore::save`](crate::store::SnapshotStore::save).
///
/// `id` is `Some` when refreshing a snapshot that was loaded from the store,
/// and `None` for a first aggregation (the store assigns the id).
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertDashboardSnapshot {
    pub id: Option<DbId>,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub balance: Decimal,
    pub games: Vec<GameSummary>,
    pub downloads: Vec<DownloadSummary>,
    pub last_updated_at: Timestamp,
}

impl UpsertDashboardSnapshot {
    /// Materialize the record the store wrote under `id`.
    pub fn into_snapshot(self, id: DbId) -> DashboardSnapshot {
        DashboardSnapshot {
            id,
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            balance: self.balance,
            games: self.games,
            downloads: self.downloads,
            last_updated_at: self.last_updated_at,
        }
    }
}

/// Response DTO handed to the API layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshotView {
    pub id: DbId,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub balance: Decimal,
    pub games: Vec<GameSummary>,
    pub downloads: Vec<DownloadSummary>,
    pub last_updated_at: Timestamp,
}

impl From<DashboardSnapshot> for DashboardSnapshotView {
    fn from(snapshot: DashboardSnapshot) -> Self {
        Self {
            id: snapshot.id,
            user_id: snapshot.user_id,
            username: snapshot.username,
            email: snapshot.email,
            balance: snapshot.balance,
            games: snapshot.games,
            downloads: snapshot.downloads,
            last_updated_at: snapshot.last_updated_at,
        }
    }
}

/// Compute the refresh timestamp for a snapshot.
///
/// The result is truncated to microseconds and is always strictly later than
/// `previous`, even when the wall clock has not advanced (or went backwards)
/// since the last refresh.
pub fn next_refresh_time(previous: Option<Timestamp>, now: Timestamp) -> Timestamp {
    let now = now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);
    match previous {
        Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}

/// Merge one aggregation pass into the value to persist.
///
/// Keeps the identity of `existing` (if any); every other field comes from
/// the upstream results of this pass. The snapshot is keyed by the requested
/// `user_id`, not by whatever id the User service echoes back.
pub fn build_snapshot(
    user_id: &str,
    existing: Option<&DashboardSnapshot>,
    user: UserDetails,
    games: Vec<GameSummary>,
    downloads: Vec<DownloadSummary>,
    now: Timestamp,
) -> UpsertDashboardSnapshot {
    UpsertDashboardSnapshot {
        id: existing.map(|s| s.id),
        last_updated_at: next_refresh_time(existing.map(|s| s.last_updated_at), now),
        user_id: user_id.to_string(),
        username: user.username,
        email: user.email,
        balance: user.balance,
        games,
        downloads,
    }
}
