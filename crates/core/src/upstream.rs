//! Contracts for the three upstream services the dashboard aggregates.
//!
//! The traits here are the I/O boundary of the aggregation engine. HTTP
//! implementations live in `gamedash-clients`; tests substitute in-process
//! fakes. Failures are typed so the orchestrator can classify them with a
//! single `match` instead of inspecting messages.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream payloads
// ---------------------------------------------------------------------------

/// User profile as reported by the User service. Never persisted directly.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Non-negative account balance.
    pub balance: Decimal,
    /// Owned game ids. `None` when the User service omits the field.
    pub game_ids: Option<Vec<String>>,
}

/// A single owned game, as resolved by the Game service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub title: String,
    pub genre: String,
}

/// A single download record, as reported by the Download service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSummary {
    pub id: String,
    pub source_url: String,
    /// Lifecycle state owned by the Download service (`PENDING`,
    /// `COMPLETED`, ...). Carried through verbatim.
    pub status: String,
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single upstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The requested resource does not exist upstream (HTTP 404).
    #[error("Resource not found upstream")]
    NotFound,

    /// The call did not complete within its deadline.
    #[error("Upstream call timed out after {0} ms")]
    Timeout(u64),

    /// The service answered with a non-2xx status other than 404.
    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("Upstream transport failure: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),
}

/// Result alias for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

// ---------------------------------------------------------------------------
// Client contracts
// ---------------------------------------------------------------------------

/// Looks up user details by id.
#[async_trait]
pub trait UserClient: Send + Sync {
    /// Returns [`UpstreamError::NotFound`] when the user does not exist.
    async fn get_user_by_id(&self, user_id: &str) -> UpstreamResult<UserDetails>;
}

/// Resolves game ids to summaries.
#[async_trait]
pub trait GameClient: Send + Sync {
    /// Unknown ids are dropped from the result rather than reported as errors,
    /// so the result may be shorter than `game_ids`.
    async fn get_games_by_ids(&self, game_ids: &[String]) -> UpstreamResult<Vec<GameSummary>>;
}

/// Lists the downloads owned by a user.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    async fn get_downloads_by_user_id(&self, user_id: &str)
        -> UpstreamResult<Vec<DownloadSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_display_status() {
        let err = UpstreamError::Status {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "Upstream returned HTTP 503: maintenance");
    }

    #[test]
    fn upstream_error_display_timeout() {
        assert_eq!(
            UpstreamError::Timeout(250).to_string(),
            "Upstream call timed out after 250 ms"
        );
    }

    #[test]
    fn download_summary_serializes_snake_case() {
        let download = DownloadSummary {
            id: "d1".into(),
            source_url: "https://cdn.example.com/g1.zip".into(),
            status: "COMPLETED".into(),
            user_id: "u1".into(),
        };
        let json = serde_json::to_value(&download).unwrap();
        assert_eq!(json["source_url"], "https://cdn.example.com/g1.zip");
        assert_eq!(json["user_id"], "u1");
    }
}
