use crate::adapters::scholar::ScholarSource;
use crate::config::SyncConfig;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: &str, content: &str) {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), content.as_bytes().to_vec());
    }

    pub async fn get_text(&self, path: &str) -> Option<String> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            SyncError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        let files = self.files.lock().await;
        files.contains_key(path)
    }
}

/// Scholar source answering from fixed JSON; publications listed in
/// `failing` make `fill_publication` fail.
pub struct MockScholar {
    pub author: Option<Value>,
    pub failing: Vec<String>,
}

impl MockScholar {
    /// 兩篇測試論文，引用數分別為 5 與 10
    pub fn two_papers() -> Self {
        Self {
            author: Some(json!({
                "name": "Mock Author",
                "publications": [
                    {
                        "pub_id": "test_id_1",
                        "bib": {"title": "Test Paper 1", "pub_year": "2023"},
                        "num_citations": 5
                    },
                    {
                        "pub_id": "test_id_2",
                        "bib": {"title": "Test Paper 2", "pub_year": "2024"},
                        "num_citations": 10
                    }
                ]
            })),
            failing: Vec::new(),
        }
    }
}

#[async_trait]
impl ScholarSource for MockScholar {
    async fn fetch_author(&self, _user_id: &str) -> Result<Value> {
        self.author.clone().ok_or_else(|| SyncError::HttpStatusError {
            url: "mock://authors".to_string(),
            status: 503,
        })
    }

    async fn fill_publication(&self, publication: &Value) -> Result<Value> {
        let id = publication["pub_id"].as_str().unwrap_or_default();
        if self.failing.iter().any(|f| f == id) {
            return Err(SyncError::processing(format!("cannot fill {}", id)));
        }

        let mut filled = publication.clone();
        filled["bib"]["author"] = json!("Jane Smith and Bo Li");
        filled["bib"]["journal"] = json!("Journal of Tests");
        Ok(filled)
    }
}

pub fn test_config() -> SyncConfig {
    let mut config = SyncConfig::default();
    config.orcid.id = Some("0000-0002-1825-0097".to_string());
    config.orcid.key_prefix = "Tran".to_string();
    config.defaults.author = "Tran, Quan".to_string();
    config.defaults.fallback_year = "2024".to_string();
    config
}
