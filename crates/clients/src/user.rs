//! User service adapter (`GET /users/{id}`).

use async_trait::async_trait;
use gamedash_core::upstream::{UpstreamError, UpstreamResult, UserClient, UserDetails};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::http::HttpUpstream;

/// Body of `GET /users/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    id: String,
    username: String,
    email: String,
    balance: Decimal,
    #[serde(default)]
    game_ids: Option<Vec<String>>,
}

impl From<UserResponse> for UserDetails {
    fn from(body: UserResponse) -> Self {
        Self {
            id: body.id,
            username: body.username,
            email: body.email,
            balance: body.balance,
            game_ids: body.game_ids,
        }
    }
}

pub struct HttpUserClient {
    upstream: HttpUpstream,
}

impl HttpUserClient {
    pub fn new(upstream: HttpUpstream) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl UserClient for HttpUserClient {
    async fn get_user_by_id(&self, user_id: &str) -> UpstreamResult<UserDetails> {
        // Dot segments would be resolved away by URL normalization.
        if matches!(user_id, "." | "..") {
            return Err(UpstreamError::NotFound);
        }
        let body: UserResponse = self.upstream.get_json(&["users", user_id], &[]).await?;
        Ok(body.into())
    }
}
