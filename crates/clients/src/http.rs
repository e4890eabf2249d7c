//! Shared request plumbing for the upstream adapters.

use std::time::Duration;

use gamedash_core::upstream::{UpstreamError, UpstreamResult};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// Build a [`reqwest::Client`] whose requests give up after `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Base URL plus HTTP client for one upstream service.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpUpstream {
    /// Create a connection to a service at `base_url`, e.g.
    /// `http://users.internal:8080`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(timeout)?,
            base_url,
            timeout,
        ))
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    ///
    /// `timeout` should match the one the client was built with; it is only
    /// used to report [`UpstreamError::Timeout`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}/{segments...}` and decode the JSON body.
    ///
    /// Each segment is percent-encoded as a single path segment, so `/`, `?`
    /// and `#` inside an id never change the request target.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        let url = self.url_for(segments)?;
        tracing::debug!(%url, "Calling upstream service");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = ensure_success(response).await?;
        response.json::<T>().await.map_err(|e| self.classify(e))
    }

    fn url_for(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| UpstreamError::Transport(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                UpstreamError::Transport(format!("base url cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Map non-2xx responses to errors: 404 becomes [`UpstreamError::NotFound`],
/// anything else [`UpstreamError::Status`] with the body text.
async fn ensure_success(response: reqwest::Response) -> UpstreamResult<reqwest::Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamError::NotFound);
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let upstream =
            HttpUpstream::new("http://users.internal:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(upstream.base_url(), "http://users.internal:8080");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let upstream =
            HttpUpstream::new("http://users.internal:8080/v2", Duration::from_secs(1)).unwrap();

        let url = upstream.url_for(&["users", "u1?role=admin#x/y"]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://users.internal:8080/v2/users/u1%3Frole=admin%23x%2Fy"
        );
    }

    #[test]
    fn unusable_base_url_is_a_transport_error() {
        let upstream = HttpUpstream::new("not a url", Duration::from_secs(1)).unwrap();

        assert!(matches!(
            upstream.url_for(&["users"]),
            Err(UpstreamError::Transport(_))
        ));
    }
}
