use crate::domain::model::PublicationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperCitations {
    pub title: String,
    pub year: String,
    pub citations: u64,
}

/// Citation counts per Scholar publication id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationReport {
    pub metadata: ReportMetadata,
    pub papers: BTreeMap<String, PaperCitations>,
}

impl CitationReport {
    /// 沒有 id 的論文以出現順序編號
    pub fn from_records(records: &[PublicationRecord], last_updated: &str) -> Self {
        let papers = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = record
                    .source_id
                    .clone()
                    .unwrap_or_else(|| format!("unknown_{}", index + 1));
                let paper = PaperCitations {
                    title: record.title.clone(),
                    year: record.year_label().to_string(),
                    citations: record.citations.unwrap_or(0),
                };
                (id, paper)
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                last_updated: last_updated.to_string(),
            },
            papers,
        }
    }

    pub fn total_citations(&self) -> u64 {
        self.papers.values().map(|paper| paper.citations).sum()
    }
}
