use crate::upstream::UpstreamError;

/// Boxed error produced by a snapshot store backend.
type BoxedStoreSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`SnapshotStore`](crate::store::SnapshotStore) backend.
#[derive(Debug, thiserror::Error)]
#[error("Snapshot store error: {0}")]
pub struct StoreError(#[source] pub BoxedStoreSource);

impl StoreError {
    pub fn new<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(source))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Failed to aggregate dashboard for user {user_id}: {source}")]
    AggregationFailure {
        user_id: String,
        #[source]
        source: UpstreamError,
    },

    #[error("Dashboard snapshot not found for user {user_id}")]
    SnapshotNotFound { user_id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
