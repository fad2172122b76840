//! HTTP client for the board API.
//!
//! Endpoints (relative to the configured base URL, e.g. `http://host/api`):
//! - `GET  /grids` → `{ grids: [...] }`
//! - `GET  /grids/{id}` → a single grid payload
//! - `GET  /segments/{id}/log` → `{ history: [...] }`
//! - `POST /segments` with `{ segments }` → `{ results: [...] }`
//!
//! Failures become [`BoardError::Api`] (non-2xx, message taken from the JSON
//! `error` field when present) or [`BoardError::Http`] (transport). Callers
//! decide how to recover; the client only logs.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::error::{BoardError, Result};
use crate::model::{
    ErrorBody, GridId, GridsResponse, IngestResponse, RawGrid, Segment, SegmentLogResponse,
    SegmentsRequest,
};

/// Characters escaped when a segment id is placed in a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Operations the board needs from its backend.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// List every grid.
    async fn fetch_grids(&self) -> Result<GridsResponse>;

    /// Fetch a single grid.
    async fn fetch_grid(&self, grid_id: GridId) -> Result<RawGrid>;

    /// Fetch the change log of a segment.
    async fn fetch_segment_log(&self, segment_id: &str) -> Result<SegmentLogResponse>;

    /// Submit segments for classification.
    async fn post_segments(&self, segments: &[Segment]) -> Result<IngestResponse>;
}

/// reqwest-backed [`BoardApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BoardError::http("Failed to build HTTP client", e))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let result = match self.client.get(&url).send().await {
            Ok(response) => handle_response(response).await,
            Err(e) => Err(BoardError::http(format!("GET {path}"), e)),
        };
        if let Err(e) = &result {
            error!(endpoint = path, error = %e, "API request failed");
        }
        result
    }
}

/// Turn a response into its JSON body or an [`BoardError::Api`].
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|m| !m.is_empty());
        return Err(BoardError::api(status.as_u16(), message));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| BoardError::http("Failed to decode response body", e))
}

#[async_trait]
impl BoardApi for ApiClient {
    async fn fetch_grids(&self) -> Result<GridsResponse> {
        self.get_json("/grids").await
    }

    async fn fetch_grid(&self, grid_id: GridId) -> Result<RawGrid> {
        self.get_json(&format!("/grids/{grid_id}")).await
    }

    async fn fetch_segment_log(&self, segment_id: &str) -> Result<SegmentLogResponse> {
        let encoded = utf8_percent_encode(segment_id, PATH_SEGMENT);
        self.get_json(&format!("/segments/{encoded}/log")).await
    }

    async fn post_segments(&self, segments: &[Segment]) -> Result<IngestResponse> {
        let path = "/segments";
        let url = self.url(path);
        debug!(%url, count = segments.len(), "POST");
        let result = match self
            .client
            .post(&url)
            .json(&SegmentsRequest { segments })
            .send()
            .await
        {
            Ok(response) => handle_response(response).await,
            Err(e) => Err(BoardError::http(format!("POST {path}"), e)),
        };
        if let Err(e) = &result {
            error!(endpoint = path, error = %e, "API request failed");
        }
        result
    }
}

/// A [`BoardApi`] with no backend: every call fails with
/// [`BoardError::Offline`], so callers take their fallback paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApi;

#[async_trait]
impl BoardApi for OfflineApi {
    async fn fetch_grids(&self) -> Result<GridsResponse> {
        Err(BoardError::Offline)
    }

    async fn fetch_grid(&self, _grid_id: GridId) -> Result<RawGrid> {
        Err(BoardError::Offline)
    }

    async fn fetch_segment_log(&self, _segment_id: &str) -> Result<SegmentLogResponse> {
        Err(BoardError::Offline)
    }

    async fn post_segments(&self, _segments: &[Segment]) -> Result<IngestResponse> {
        Err(BoardError::Offline)
    }
}

/// Build the API for the given settings: offline, or reqwest-backed.
pub fn connect(config: &ApiConfig, offline: bool) -> Result<Box<dyn BoardApi>> {
    if offline {
        Ok(Box::new(OfflineApi))
    } else {
        Ok(Box::new(ApiClient::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_secs: 5,
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/grids"), "http://localhost:8000/api/grids");
    }

    #[test]
    fn test_segment_id_encoding() {
        let encoded = utf8_percent_encode("manual 1/2", PATH_SEGMENT).to_string();
        assert_eq!(encoded, "manual%201%2F2");
        let plain = utf8_percent_encode("manual-1700000000000-0", PATH_SEGMENT).to_string();
        assert_eq!(plain, "manual-1700000000000-0");
    }

    #[tokio::test]
    async fn test_offline_api_always_fails() {
        let api = OfflineApi;
        assert!(matches!(api.fetch_grids().await, Err(BoardError::Offline)));
        assert!(matches!(api.fetch_segment_log("x").await, Err(BoardError::Offline)));
        assert!(matches!(api.post_segments(&[]).await, Err(BoardError::Offline)));
    }
}
