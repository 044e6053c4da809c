use crate::adapters::http::{build_client, get_json, join_url};
use crate::utils::error::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Read-only client for the ORCID public API of a single iD.
pub struct OrcidClient {
    client: Client,
    base_url: String,
    orcid_id: String,
    listing_timeout: Duration,
    detail_timeout: Duration,
}

impl OrcidClient {
    pub fn new(
        base_url: &str,
        orcid_id: &str,
        listing_timeout: Duration,
        detail_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.to_string(),
            orcid_id: orcid_id.to_string(),
            listing_timeout,
            detail_timeout,
        })
    }

    pub fn orcid_id(&self) -> &str {
        &self.orcid_id
    }

    /// `GET {base}/{orcid}/works`，回傳 `group` 陣列
    pub async fn list_works(&self) -> Result<Vec<Value>> {
        let url = join_url(&self.base_url, &[self.orcid_id.as_str(), "works"])?;
        let body = get_json(&self.client, &url, self.listing_timeout).await?;

        Ok(body
            .get("group")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// `GET {base}/{orcid}/work/{put_code}`
    pub async fn work_detail(&self, put_code: &str) -> Result<Value> {
        let url = join_url(&self.base_url, &[self.orcid_id.as_str(), "work", put_code])?;
        get_json(&self.client, &url, self.detail_timeout).await
    }
}

/// 每個 group 取第一筆 work-summary；缺少時回傳空物件
pub fn first_summary(group: &Value) -> Value {
    group
        .get("work-summary")
        .and_then(Value::as_array)
        .and_then(|summaries| summaries.first())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()))
}
