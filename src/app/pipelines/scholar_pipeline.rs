use super::{append_entries, read_text};
use crate::adapters::scholar::{publications_of, ScholarSource};
use crate::core::dedupe::TitleIndex;
use crate::core::normalize::{normalize_scholar, scholar_entry, scholar_publication_id};
use crate::core::{ConfigProvider, Pipeline, RawRecord, Storage, SyncBatch, SyncSummary};
use crate::utils::error::Result;

/// Appends Scholar publications whose titles are not yet in the
/// bibliography.
pub struct ScholarSyncPipeline<S: Storage, C: ConfigProvider, P: ScholarSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: P,
    pub(crate) user_id: String,
}

impl<S: Storage, C: ConfigProvider, P: ScholarSource> ScholarSyncPipeline<S, C, P> {
    pub fn new(storage: S, config: C, source: P, user_id: String) -> Self {
        Self {
            storage,
            config,
            source,
            user_id,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: ScholarSource> Pipeline for ScholarSyncPipeline<S, C, P> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        tracing::info!("Fetching publications for Google Scholar ID: {}", self.user_id);

        // 作者列表失敗即中止
        let author = self.source.fetch_author(&self.user_id).await?;

        let Some(publications) = publications_of(&author) else {
            tracing::info!("No publications found.");
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(publications.len());
        for publication in publications {
            match self.source.fill_publication(publication).await {
                Ok(filled) => records.push(RawRecord {
                    summary: publication.clone(),
                    detail: filled,
                }),
                Err(e) => tracing::warn!("⚠️ Error processing publication: {}", e),
            }
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<SyncBatch> {
        let bib_file = self.config.bib_file();
        let existing = read_text(&self.storage, bib_file).await?.unwrap_or_default();
        let mut index = TitleIndex::from_bibliography(&existing);
        if index.is_empty() {
            tracing::info!("No existing papers in {}", bib_file);
        } else {
            tracing::info!("Found {} existing papers in {}", index.len(), bib_file);
        }

        let mut batch = SyncBatch::default();
        for raw in data {
            let mut record = normalize_scholar(&raw.detail, self.config.default_author());
            if record.source_id.is_none() {
                record.source_id = scholar_publication_id(&raw.summary);
            }
            if record.citations.is_none() {
                record.citations = raw.summary.get("num_citations").and_then(|v| v.as_u64());
            }

            if index.contains(&record.title) {
                tracing::info!("Skipping existing paper: {}", record.title);
                batch.skipped_titles.push(record.title);
                continue;
            }

            tracing::info!("Adding new paper: {}", record.title);
            index.insert(&record.title);
            batch.bib_entries.push(scholar_entry(&record));
            batch.publications.push(record);
        }

        Ok(batch)
    }

    async fn load(&self, batch: SyncBatch) -> Result<SyncSummary> {
        let mut summary = SyncSummary {
            added: batch.bib_entries.len(),
            skipped: batch.skipped_titles.len(),
            outputs: Vec::new(),
        };

        if batch.bib_entries.is_empty() {
            tracing::info!("No new papers to add.");
            return Ok(summary);
        }

        let bib_file = self.config.bib_file();
        append_entries(&self.storage, bib_file, &batch.bib_entries).await?;
        tracing::info!("Added {} new papers to {}", summary.added, bib_file);

        summary.outputs.push(bib_file.to_string());
        Ok(summary)
    }
}
