//! Download service adapter (`GET /downloads?userId=...`).

use async_trait::async_trait;
use gamedash_core::upstream::{DownloadClient, DownloadSummary, UpstreamResult};
use serde::Deserialize;

use crate::http::HttpUpstream;

/// One element of the `GET /downloads` response array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadResponse {
    id: String,
    source_url: String,
    status: String,
    user_id: String,
}

impl From<DownloadResponse> for DownloadSummary {
    fn from(body: DownloadResponse) -> Self {
        Self {
            id: body.id,
            source_url: body.source_url,
            status: body.status,
            user_id: body.user_id,
        }
    }
}

pub struct HttpDownloadClient {
    upstream: HttpUpstream,
}

impl HttpDownloadClient {
    pub fn new(upstream: HttpUpstream) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl DownloadClient for HttpDownloadClient {
    async fn get_downloads_by_user_id(
        &self,
        user_id: &str,
    ) -> UpstreamResult<Vec<DownloadSummary>> {
        let body: Vec<DownloadResponse> = self
            .upstream
            .get_json(&["downloads"], &[("userId", user_id)])
            .await?;
        Ok(body.into_iter().map(Into::into).collect())
    }
}
