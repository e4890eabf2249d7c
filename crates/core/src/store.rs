//! Snapshot persistence contract and the in-process implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::snapshot::{DashboardSnapshot, UpsertDashboardSnapshot};
use crate::types::DbId;

/// Keyed persistence for dashboard snapshots.
///
/// Implementations must never hold two records with the same `user_id`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: &str)
        -> Result<Option<DashboardSnapshot>, StoreError>;

    /// All snapshots, ordered by `user_id`.
    async fn find_all(&self) -> Result<Vec<DashboardSnapshot>, StoreError>;

    /// Create or overwrite the snapshot for `input.user_id`.
    ///
    /// An input carrying an `id` overwrites that record. An input without
    /// one is inserted, unless a record for the same `user_id` appeared in
    /// the meantime, in which case that record is overwritten and keeps its
    /// id (last writer wins).
    async fn save(&self, input: &UpsertDashboardSnapshot)
        -> Result<DashboardSnapshot, StoreError>;

    /// Delete the snapshot for a user. Returns `true` if a record was removed;
    /// deleting an absent key is not an error.
    async fn delete_by_user_id(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: DbId,
    by_user: BTreeMap<String, DashboardSnapshot>,
}

/// Snapshot store kept in process memory.
///
/// Used for local development (`SNAPSHOT_STORE=memory`) and tests. Contents
/// are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    state: RwLock<MemoryState>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.state.read().await.by_user.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<DashboardSnapshot>, StoreError> {
        Ok(self.state.read().await.by_user.get(user_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<DashboardSnapshot>, StoreError> {
        Ok(self.state.read().await.by_user.values().cloned().collect())
    }

    async fn save(
        &self,
        input: &UpsertDashboardSnapshot,
    ) -> Result<DashboardSnapshot, StoreError> {
        let mut state = self.state.write().await;

        let id = match state.by_user.get(&input.user_id) {
            Some(current) => current.id,
            None => {
                state.last_id += 1;
                state.last_id
            }
        };

        let saved = input.clone().into_snapshot(id);
        state.by_user.insert(saved.user_id.clone(), saved.clone());
        Ok(saved)
    }

    async fn delete_by_user_id(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.state.write().await.by_user.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    fn draft(user_id: &str, username: &str) -> UpsertDashboardSnapshot {
        UpsertDashboardSnapshot {
            id: None,
            user_id: user_id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            balance: dec!(10.00),
            games: vec![],
            downloads: vec![],
            last_updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let store = InMemorySnapshotStore::new();
        let a = store.save(&draft("u1", "alice")).await.unwrap();
        let b = store.save(&draft("u2", "bob")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn save_with_id_overwrites_in_place() {
        let store = InMemorySnapshotStore::new();
        let first = store.save(&draft("u1", "alice")).await.unwrap();

        let mut refresh = draft("u1", "alice-renamed");
        refresh.id = Some(first.id);
        let second = store.save(&refresh).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.username, "alice-renamed");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_for_existing_user_keeps_single_record() {
        let store = InMemorySnapshotStore::new();
        let first = store.save(&draft("u1", "alice")).await.unwrap();
        let second = store.save(&draft("u1", "alice-again")).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(store.len().await, 1);
        let stored = store.find_by_user_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.username, "alice-again");
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_user_id() {
        let store = InMemorySnapshotStore::new();
        store.save(&draft("u2", "bob")).await.unwrap();
        store.save(&draft("u1", "alice")).await.unwrap();

        let all = store.find_all().await.unwrap();
        let keys: Vec<_> = all.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(keys, ["u1", "u2"]);
    }

    #[tokio::test]
    async fn delete_absent_key_is_not_an_error() {
        let store = InMemorySnapshotStore::new();
        assert!(!store.delete_by_user_id("nobody").await.unwrap());

        store.save(&draft("u1", "alice")).await.unwrap();
        assert!(store.delete_by_user_id("u1").await.unwrap());
        assert!(store.is_empty().await);
    }
}
