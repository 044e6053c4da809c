use serde::{Deserialize, Serialize};

pub const UNKNOWN_YEAR: &str = "Unknown";

/// 遠端服務回傳的原始資料：列表項目與逐筆詳細資料
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub summary: serde_json::Value,
    pub detail: serde_json::Value,
}

/// A publication flattened out of a heterogeneous remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub venue: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub external_id: Option<String>,
    pub citations: Option<u64>,
    pub source_id: Option<String>,
}

impl PublicationRecord {
    pub fn year_label(&self) -> &str {
        self.year.as_deref().unwrap_or(UNKNOWN_YEAR)
    }

    /// BibTeX `author` value: names joined with ` and `.
    pub fn author_field(&self) -> String {
        self.authors.join(" and ")
    }
}

/// One entry of `cv.sections.Publications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvPublication {
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub summary: String,
}

/// transform 階段的輸出
#[derive(Debug, Clone, Default)]
pub struct SyncBatch {
    pub publications: Vec<PublicationRecord>,
    pub bib_entries: Vec<String>,
    pub cv_entries: Vec<CvPublication>,
    pub skipped_titles: Vec<String>,
}

/// load 階段的輸出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub skipped: usize,
    pub outputs: Vec<String>,
}
