use crate::domain::model::{RawRecord, SyncBatch, SyncSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// How the bibliography file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BibMode {
    /// 只追加新條目
    Append,
    /// 以本次抓取結果完整覆寫
    #[default]
    Overwrite,
}

pub trait ConfigProvider: Send + Sync {
    fn bib_file(&self) -> &str;
    fn cv_file(&self) -> &str;
    fn citations_file(&self) -> Option<&str>;
    fn default_author(&self) -> &str;
    fn key_prefix(&self) -> &str;
    fn fallback_year(&self) -> &str;
    fn bib_mode(&self) -> BibMode;
    fn listing_timeout(&self) -> Duration;
    fn detail_timeout(&self) -> Duration;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<SyncBatch>;
    async fn load(&self, batch: SyncBatch) -> Result<SyncSummary>;
}
