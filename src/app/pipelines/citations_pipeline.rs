use crate::adapters::scholar::{publications_of, ScholarSource};
use crate::core::citations::CitationReport;
use crate::core::normalize::normalize_scholar;
use crate::core::{ConfigProvider, Pipeline, RawRecord, Storage, SyncBatch, SyncSummary};
use crate::utils::error::Result;

/// Citation counts straight from the author listing; no per-publication
/// requests are made.
pub struct CitationsPipeline<S: Storage, C: ConfigProvider, P: ScholarSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: P,
    pub(crate) user_id: String,
    last_updated: String,
}

impl<S: Storage, C: ConfigProvider, P: ScholarSource> CitationsPipeline<S, C, P> {
    pub fn new(storage: S, config: C, source: P, user_id: String) -> Self {
        Self {
            storage,
            config,
            source,
            user_id,
            last_updated: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    pub fn with_last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = last_updated.into();
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: ScholarSource> Pipeline for CitationsPipeline<S, C, P> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        tracing::info!("Fetching citations for Google Scholar ID: {}", self.user_id);

        let author = self.source.fetch_author(&self.user_id).await?;
        let records = publications_of(&author)
            .map(|publications| {
                publications
                    .iter()
                    .map(|publication| RawRecord {
                        summary: publication.clone(),
                        detail: publication.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if records.is_empty() {
            tracing::info!("No publications found.");
        }
        Ok(records)
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<SyncBatch> {
        let publications = data
            .iter()
            .map(|raw| normalize_scholar(&raw.summary, self.config.default_author()))
            .inspect(|record| {
                tracing::info!(
                    "Found: {} ({}) - Citations: {}",
                    record.title,
                    record.year_label(),
                    record.citations.unwrap_or(0)
                );
            })
            .collect();

        Ok(SyncBatch {
            publications,
            ..Default::default()
        })
    }

    async fn load(&self, batch: SyncBatch) -> Result<SyncSummary> {
        let report = CitationReport::from_records(&batch.publications, &self.last_updated);
        let json = serde_json::to_string_pretty(&report)?;

        let mut summary = SyncSummary {
            added: report.papers.len(),
            skipped: 0,
            outputs: Vec::new(),
        };

        match self.config.citations_file() {
            Some(path) => {
                self.storage.write_file(path, json.as_bytes()).await?;
                tracing::info!(
                    "Saved citations for {} papers ({} total) to {}",
                    report.papers.len(),
                    report.total_citations(),
                    path
                );
                summary.outputs.push(path.to_string());
            }
            None => println!("{}", json),
        }

        Ok(summary)
    }
}
