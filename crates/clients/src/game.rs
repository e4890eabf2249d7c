//! Game service adapter (`GET /games?ids=...`).

use async_trait::async_trait;
use gamedash_core::upstream::{GameClient, GameSummary, UpstreamResult};
use serde::Deserialize;

use crate::http::HttpUpstream;

/// Separator of the `ids` query parameter. Ids containing it are not
/// addressable through this endpoint.
const ID_SEPARATOR: char = ',';

/// One element of the `GET /games` response array.
#[derive(Debug, Deserialize)]
struct GameResponse {
    id: String,
    title: String,
    genre: String,
}

impl From<GameResponse> for GameSummary {
    fn from(body: GameResponse) -> Self {
        Self {
            id: body.id,
            title: body.title,
            genre: body.genre,
        }
    }
}

pub struct HttpGameClient {
    upstream: HttpUpstream,
}

impl HttpGameClient {
    pub fn new(upstream: HttpUpstream) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl GameClient for HttpGameClient {
    async fn get_games_by_ids(&self, game_ids: &[String]) -> UpstreamResult<Vec<GameSummary>> {
        let (addressable, skipped): (Vec<&str>, Vec<&str>) = game_ids
            .iter()
            .map(String::as_str)
            .partition(|id| !id.contains(ID_SEPARATOR));
        if !skipped.is_empty() {
            tracing::warn!(
                skipped = ?skipped,
                "Game ids containing ',' cannot be requested and were skipped"
            );
        }
        if addressable.is_empty() {
            return Ok(Vec::new());
        }

        let ids = addressable.join(",");
        let body: Vec<GameResponse> = self
            .upstream
            .get_json(&["games"], &[("ids", ids.as_str())])
            .await?;
        Ok(body.into_iter().map(Into::into).collect())
    }
}
