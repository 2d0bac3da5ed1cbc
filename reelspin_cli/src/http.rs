use reqwest::{Client, Response};
use tracing::{debug, warn};

use reelspin_shared::{ApiError, ApiResult, CatalogResponse, SpinResponse};

/// Talks to the slot server. Failures are surfaced once, never retried.
pub struct SlotClient {
    http: Client,
    base_url: String,
}

impl SlotClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn catalog(&self) -> ApiResult<CatalogResponse> {
        let resp = self
            .http
            .get(format!("{}/catalog", self.base_url))
            .send()
            .await;
        decode(resp).await
    }

    pub async fn spin(&self) -> ApiResult<SpinResponse> {
        let resp = self
            .http
            .post(format!("{}/spin", self.base_url))
            .send()
            .await;
        decode(resp).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    resp: Result<Response, reqwest::Error>,
) -> ApiResult<T> {
    let resp = resp.map_err(|e| {
        warn!("request failed: {e}");
        ApiError::Transport(e.to_string())
    })?;
    let status = resp.status();
    if !status.is_success() {
        warn!(%status, url = %resp.url(), "server rejected request");
        return Err(ApiError::Status(status.as_u16()));
    }
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    debug!(%body, "response");
    Ok(serde_json::from_str(&body)?)
}
