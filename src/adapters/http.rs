use crate::utils::error::{Result, SyncError};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("pubsync/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// 發送單次 GET 並解析 JSON；非 2xx 回應轉成 HttpStatusError，不重試
pub async fn get_json(client: &Client, url: &str, timeout: Duration) -> Result<serde_json::Value> {
    tracing::debug!("Making API request to: {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    tracing::debug!("API response status: {}", status);

    if !status.is_success() {
        return Err(SyncError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json().await?)
}

/// Append path segments to `base`, percent-encoding each one.
pub fn join_url(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| SyncError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: base.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    url.path_segments_mut()
        .map_err(|_| SyncError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}
