//! Google Scholar access.
//!
//! Scholar has no public API, so profiles are read through a JSON gateway
//! that mirrors the `scholarly` author/publication objects:
//!
//! - `GET {base}/authors/{user_id}` returns the filled author, including a
//!   `publications` list of unfilled publications.
//! - `GET {base}/publications/{author_pub_id}` returns one filled
//!   publication with its `bib` mapping and `pub_url`.

use crate::adapters::http::{build_client, get_json, join_url};
use crate::core::normalize::scholar_publication_id;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

#[async_trait]
pub trait ScholarSource: Send + Sync {
    /// 作者資料與其論文列表；失敗時整個流程中止
    async fn fetch_author(&self, user_id: &str) -> Result<Value>;

    /// 補齊單篇論文的詳細欄位；失敗時只略過該篇
    async fn fill_publication(&self, publication: &Value) -> Result<Value>;
}

/// The publications listed on an author object, if any.
pub fn publications_of(author: &Value) -> Option<&Vec<Value>> {
    author.get("publications").and_then(Value::as_array)
}

pub struct HttpScholarClient {
    client: Client,
    base_url: String,
    listing_timeout: Duration,
    detail_timeout: Duration,
}

impl HttpScholarClient {
    pub fn new(base_url: &str, listing_timeout: Duration, detail_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.to_string(),
            listing_timeout,
            detail_timeout,
        })
    }
}

#[async_trait]
impl ScholarSource for HttpScholarClient {
    async fn fetch_author(&self, user_id: &str) -> Result<Value> {
        let url = join_url(&self.base_url, &["authors", user_id])?;
        let author = get_json(&self.client, &url, self.listing_timeout).await?;

        if !author.is_object() {
            return Err(SyncError::processing(format!(
                "Author response for {} is not an object",
                user_id
            )));
        }
        Ok(author)
    }

    async fn fill_publication(&self, publication: &Value) -> Result<Value> {
        let id = scholar_publication_id(publication)
            .ok_or_else(|| SyncError::processing("Publication has no author_pub_id"))?;

        let url = join_url(&self.base_url, &["publications", id.as_str()])?;
        get_json(&self.client, &url, self.detail_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_author_and_fill_publication() {
        let server = MockServer::start();
        let author_mock = server.mock(|when, then| {
            when.method(GET).path("/authors/NfwzqKoAAAAJ");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "scholar_id": "NfwzqKoAAAAJ",
                    "publications": [{"author_pub_id": "NfwzqKoAAAAJ:abc", "bib": {"title": "A"}}]
                }));
        });
        let pub_mock = server.mock(|when, then| {
            when.method(GET).path("/publications/NfwzqKoAAAAJ:abc");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"bib": {"title": "A", "pub_year": "2023"}}));
        });

        let client = HttpScholarClient::new(
            &server.base_url(),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap();

        let author = client.fetch_author("NfwzqKoAAAAJ").await.unwrap();
        let publications = publications_of(&author).unwrap();
        assert_eq!(publications.len(), 1);

        let filled = client.fill_publication(&publications[0]).await.unwrap();
        assert_eq!(filled["bib"]["pub_year"], "2023");

        author_mock.assert();
        pub_mock.assert();
    }

    #[tokio::test]
    async fn test_fill_publication_without_id_fails() {
        let client = HttpScholarClient::new(
            "http://localhost:1",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client.fill_publication(&json!({"bib": {"title": "A"}})).await;
        assert!(matches!(result, Err(SyncError::ProcessingError { .. })));
    }
}
