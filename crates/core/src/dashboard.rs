//! Profile dashboard aggregation.
//!
//! [`DashboardService`] fans out to the User, Game and Download services,
//! merges the results and upserts one snapshot per user. Only the User call
//! is fatal: Game and Download failures degrade to empty lists so a dashboard
//! is still produced when enrichment is unavailable.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::{DashboardError, DashboardResult};
use crate::snapshot::{build_snapshot, DashboardSnapshotView};
use crate::store::SnapshotStore;
use crate::upstream::{
    DownloadClient, DownloadSummary, GameClient, GameSummary, UpstreamError, UpstreamResult,
    UserClient, UserDetails,
};

/// Default deadline applied to each upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates dashboard aggregation and snapshot reads.
///
/// Concurrent refreshes of the same user are not serialized. The store
/// resolves them as last-writer-wins on `save`.
#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserClient>,
    games: Arc<dyn GameClient>,
    downloads: Arc<dyn DownloadClient>,
    store: Arc<dyn SnapshotStore>,
    upstream_timeout: Duration,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserClient>,
        games: Arc<dyn GameClient>,
        downloads: Arc<dyn DownloadClient>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            users,
            games,
            downloads,
            store,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// Override the per-call upstream deadline.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// The snapshot store backing this service.
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    // ---- aggregation ----

    /// Aggregate the user's dashboard from upstream and persist it.
    ///
    /// Fails with [`DashboardError::UserNotFound`] or
    /// [`DashboardError::AggregationFailure`] when the User service cannot
    /// supply the user; in both cases no other service is called and the
    /// store is left untouched.
    pub async fn get_or_create(&self, user_id: &str) -> DashboardResult<DashboardSnapshotView> {
        validate_user_id(user_id)?;
        tracing::debug!(user_id, "Aggregating dashboard");

        let user = self.fetch_user(user_id).await?;
        let game_ids = user.game_ids.clone().unwrap_or_default();

        let (games, downloads) = tokio::join!(
            self.fetch_games(user_id, &game_ids),
            self.fetch_downloads(user_id),
        );

        let existing = self.store.find_by_user_id(user_id).await?;
        let draft = build_snapshot(
            user_id,
            existing.as_ref(),
            user,
            games,
            downloads,
            Utc::now(),
        );
        let saved = self.store.save(&draft).await?;

        tracing::info!(
            user_id,
            snapshot_id = saved.id,
            created = existing.is_none(),
            games = saved.games.len(),
            downloads = saved.downloads.len(),
            "Dashboard snapshot saved"
        );
        Ok(saved.into())
    }

    /// `POST` flavour of [`get_or_create`](Self::get_or_create).
    pub async fn create_or_refresh(
        &self,
        user_id: &str,
    ) -> DashboardResult<DashboardSnapshotView> {
        self.get_or_create(user_id).await
    }

    /// `PUT` flavour of [`get_or_create`](Self::get_or_create).
    pub async fn update(&self, user_id: &str) -> DashboardResult<DashboardSnapshotView> {
        self.get_or_create(user_id).await
    }

    // ---- reads ----

    /// Every persisted snapshot. Never calls upstream.
    pub async fn get_all(&self) -> DashboardResult<Vec<DashboardSnapshotView>> {
        let snapshots = self.store.find_all().await?;
        Ok(snapshots.into_iter().map(Into::into).collect())
    }

    /// The persisted snapshot for a user. Never calls upstream.
    pub async fn get_by_user_id(&self, user_id: &str) -> DashboardResult<DashboardSnapshotView> {
        validate_user_id(user_id)?;
        self.store
            .find_by_user_id(user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| snapshot_not_found(user_id))
    }

    /// Delete the persisted snapshot for a user.
    pub async fn delete(&self, user_id: &str) -> DashboardResult<()> {
        validate_user_id(user_id)?;
        if self.store.find_by_user_id(user_id).await?.is_none() {
            return Err(snapshot_not_found(user_id));
        }
        self.store.delete_by_user_id(user_id).await?;
        tracing::info!(user_id, "Dashboard snapshot deleted");
        Ok(())
    }

    // ---- private helpers ----

    async fn fetch_user(&self, user_id: &str) -> DashboardResult<UserDetails> {
        self.with_deadline(self.users.get_user_by_id(user_id))
            .await
            .map_err(|err| classify_user_failure(user_id, err))
    }

    async fn fetch_games(&self, user_id: &str, game_ids: &[String]) -> Vec<GameSummary> {
        if game_ids.is_empty() {
            tracing::debug!(user_id, "User owns no games, skipping game lookup");
            return Vec::new();
        }

        let result = self
            .with_deadline(self.games.get_games_by_ids(game_ids))
            .await;
        if let Ok(games) = &result {
            if let Some(missing) = unresolved_count(game_ids.len(), games.len()) {
                tracing::warn!(
                    user_id,
                    requested = game_ids.len(),
                    resolved = games.len(),
                    missing,
                    "Game service did not resolve every owned game"
                );
            }
        }
        degrade("game", user_id, result)
    }

    async fn fetch_downloads(&self, user_id: &str) -> Vec<DownloadSummary> {
        degrade(
            "download",
            user_id,
            self.with_deadline(self.downloads.get_downloads_by_user_id(user_id))
                .await,
        )
    }

    async fn with_deadline<T, F>(&self, call: F) -> UpstreamResult<T>
    where
        F: Future<Output = UpstreamResult<T>>,
    {
        match tokio::time::timeout(self.upstream_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(
                u64::try_from(self.upstream_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}

/// Map a User-service failure onto the caller-visible error.
fn classify_user_failure(user_id: &str, err: UpstreamError) -> DashboardError {
    match err {
        UpstreamError::NotFound => {
            tracing::warn!(user_id, "User not found upstream");
            DashboardError::UserNotFound {
                user_id: user_id.to_string(),
            }
        }
        source => {
            tracing::error!(user_id, error = %source, "User service call failed");
            DashboardError::AggregationFailure {
                user_id: user_id.to_string(),
                source,
            }
        }
    }
}

/// Resolve a non-critical enrichment call to a list, substituting an empty
/// one on failure.
fn degrade<T>(service: &'static str, user_id: &str, result: UpstreamResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(
                user_id,
                service,
                error = %err,
                "Enrichment call failed, continuing with an empty list"
            );
            Vec::new()
        }
    }
}

/// How many requested ids the Game service left unresolved, if any.
fn unresolved_count(requested: usize, resolved: usize) -> Option<usize> {
    requested.checked_sub(resolved).filter(|&missing| missing > 0)
}

fn validate_user_id(user_id: &str) -> DashboardResult<()> {
    if user_id.trim().is_empty() {
        return Err(DashboardError::Validation(
            "user_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn snapshot_not_found(user_id: &str) -> DashboardError {
    DashboardError::SnapshotNotFound {
        user_id: user_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
