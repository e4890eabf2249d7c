#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use gamedash_core::dashboard::DashboardService;
use gamedash_core::error::StoreError;
use gamedash_core::snapshot::{DashboardSnapshot, UpsertDashboardSnapshot};
use gamedash_core::store::{InMemorySnapshotStore, SnapshotStore};
use gamedash_core::upstream::{
    DownloadClient, DownloadSummary, GameClient, GameSummary, UpstreamError, UpstreamResult,
    UserClient, UserDetails,
};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use tower::ServiceExt;

use gamedash_api::config::{ServerConfig, StoreBackend, UpstreamConfig};
use gamedash_api::router::build_app_router;
use gamedash_api::state::AppState;

// ---------------------------------------------------------------------------
// Config / app
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        snapshot_store: StoreBackend::Memory,
        database_url: None,
        upstream: UpstreamConfig {
            user_service_url: "http://users.test".to_string(),
            game_service_url: "http://games.test".to_string(),
            download_service_url: "http://downloads.test".to_string(),
            timeout_secs: 1,
        },
    }
}

/// Build the full application router around the given service.
pub fn build_test_app(dashboards: DashboardService) -> Router {
    build_app_router(AppState { dashboards }, &test_config())
}

/// A test app wired to [`FakeUpstream::standard`] and an empty in-memory store.
pub fn standard_app() -> (Router, Arc<FakeUpstream>, Arc<InMemorySnapshotStore>) {
    let upstream = Arc::new(FakeUpstream::standard());
    let store = Arc::new(InMemorySnapshotStore::new());
    let service = DashboardService::new(
        upstream.clone(),
        upstream.clone(),
        upstream.clone(),
        store.clone(),
    );
    (build_test_app(service), upstream, store)
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Plays all three upstream services from in-memory fixtures.
#[derive(Default)]
pub struct FakeUpstream {
    pub users: HashMap<String, UpstreamResult<UserDetails>>,
    pub games: HashMap<String, GameSummary>,
    pub downloads: HashMap<String, Vec<DownloadSummary>>,
    pub download_outage: bool,
    pub calls: AtomicUsize,
}

impl FakeUpstream {
    /// `u1` owns `g1` + `g2` and has one download; `u2` owns `g1` and the
    /// unknown `ghost`; `u5` makes the User service fail with a 503.
    pub fn standard() -> Self {
        let mut users = HashMap::new();
        users.insert("u1".to_string(), Ok(user("u1", &["g1", "g2"])));
        users.insert("u2".to_string(), Ok(user("u2", &["g1", "ghost"])));
        users.insert(
            "u5".to_string(),
            Err(UpstreamError::Status {
                status: 503,
                body: "maintenance".to_string(),
            }),
        );

        let games = ["g1", "g2"]
            .into_iter()
            .map(|id| {
                (
                    id.to_string(),
                    GameSummary {
                        id: id.to_string(),
                        title: format!("Game {id}"),
                        genre: "Puzzle".to_string(),
                    },
                )
            })
            .collect();

        let mut downloads = HashMap::new();
        downloads.insert(
            "u1".to_string(),
            vec![DownloadSummary {
                id: "d1".to_string(),
                source_url: "https://cdn.example.com/g1.zip".to_string(),
                status: "COMPLETED".to_string(),
                user_id: "u1".to_string(),
            }],
        );

        Self {
            users,
            games,
            downloads,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn user(id: &str, game_ids: &[&str]) -> UserDetails {
    UserDetails {
        id: id.to_string(),
        username: format!("{id}-name"),
        email: format!("{id}@example.com"),
        balance: dec!(150.75),
        game_ids: Some(game_ids.iter().map(|g| g.to_string()).collect()),
    }
}

#[async_trait]
impl UserClient for FakeUpstream {
    async fn get_user_by_id(&self, user_id: &str) -> UpstreamResult<UserDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(user_id)
            .cloned()
            .unwrap_or(Err(UpstreamError::NotFound))
    }
}

#[async_trait]
impl GameClient for FakeUpstream {
    async fn get_games_by_ids(&self, game_ids: &[String]) -> UpstreamResult<Vec<GameSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(game_ids
            .iter()
            .filter_map(|id| self.games.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl DownloadClient for FakeUpstream {
    async fn get_downloads_by_user_id(
        &self,
        user_id: &str,
    ) -> UpstreamResult<Vec<DownloadSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.download_outage {
            return Err(UpstreamError::Transport("connection reset".to_string()));
        }
        Ok(self.downloads.get(user_id).cloned().unwrap_or_default())
    }
}

/// Snapshot store whose every call fails.
pub struct BrokenStore;

fn broken() -> StoreError {
    StoreError::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "store offline",
    ))
}

#[async_trait]
impl SnapshotStore for BrokenStore {
    async fn find_by_user_id(
        &self,
        _user_id: &str,
    ) -> Result<Option<DashboardSnapshot>, StoreError> {
        Err(broken())
    }

    async fn find_all(&self) -> Result<Vec<DashboardSnapshot>, StoreError> {
        Err(broken())
    }

    async fn save(
        &self,
        _input: &UpsertDashboardSnapshot,
    ) -> Result<DashboardSnapshot, StoreError> {
        Err(broken())
    }

    async fn delete_by_user_id(&self, _user_id: &str) -> Result<bool, StoreError> {
        Err(broken())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(broken())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a bodiless request and return the response.
pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
