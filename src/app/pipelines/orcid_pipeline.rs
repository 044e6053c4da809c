use super::{append_entries, read_text, read_utf8};
use crate::adapters::orcid::{first_summary, OrcidClient};
use crate::core::cv::{replace_publications, sort_by_release_desc};
use crate::core::dedupe::TitleIndex;
use crate::core::normalize::{
    cv_entry, normalize_orcid, orcid_citation, orcid_fallback_entry, orcid_put_code,
    render_orcid_entry,
};
use crate::core::{
    BibMode, ConfigProvider, Pipeline, RawRecord, Storage, SyncBatch, SyncSummary,
};
use crate::utils::error::{Result, SyncError};

/// Rebuilds the bibliography (or appends to it) from ORCID works and
/// regenerates the CV publications list.
pub struct OrcidSyncPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: OrcidClient,
}

impl<S: Storage, C: ConfigProvider> OrcidSyncPipeline<S, C> {
    pub fn new(storage: S, config: C, client: OrcidClient) -> Self {
        Self {
            storage,
            config,
            client,
        }
    }

    async fn write_bibliography(&self, entries: &[String]) -> Result<()> {
        let bib_file = self.config.bib_file();
        match self.config.bib_mode() {
            BibMode::Overwrite => {
                let mut content = entries.join("\n\n");
                content.push('\n');
                self.storage.write_file(bib_file, content.as_bytes()).await
            }
            BibMode::Append => append_entries(&self.storage, bib_file, entries).await,
        }
    }

    /// CV 檔不存在時略過，回傳 false
    async fn update_cv(&self, batch: &SyncBatch) -> Result<bool> {
        let cv_file = self.config.cv_file();
        let Some(document) = read_utf8(&self.storage, cv_file).await? else {
            tracing::info!("CV file {} not found, skipping CV update", cv_file);
            return Ok(false);
        };

        let updated = replace_publications(&document, &batch.cv_entries)?;
        self.storage.write_file(cv_file, updated.as_bytes()).await?;
        Ok(true)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrcidSyncPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        tracing::info!("🚀 Connecting to ORCID API (ID: {})...", self.client.orcid_id());

        let groups = self.client.list_works().await?;
        tracing::info!("📦 Found {} works, fetching details...", groups.len());

        let mut records = Vec::with_capacity(groups.len());
        for group in &groups {
            let summary = first_summary(group);
            let detail = match orcid_put_code(&summary) {
                Some(put_code) => self.client.work_detail(&put_code).await,
                None => Err(SyncError::processing("work summary has no put-code")),
            };

            match detail {
                Ok(detail) => records.push(RawRecord { summary, detail }),
                Err(e) => tracing::warn!("⚠️ Skipping work: {}", e),
            }
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<SyncBatch> {
        let mut index = match self.config.bib_mode() {
            BibMode::Append => {
                let existing = read_text(&self.storage, self.config.bib_file())
                    .await?
                    .unwrap_or_default();
                TitleIndex::from_bibliography(&existing)
            }
            BibMode::Overwrite => TitleIndex::default(),
        };

        let mut batch = SyncBatch::default();
        for raw in data {
            let record = normalize_orcid(&raw.summary, &raw.detail, self.config.default_author());
            batch.cv_entries.push(cv_entry(&record));

            if !index.insert(&record.title) {
                tracing::info!("Skipping existing paper: {}", record.title);
                batch.skipped_titles.push(record.title);
                continue;
            }

            let raw_entry = orcid_citation(&raw.detail)
                .unwrap_or_else(|| orcid_fallback_entry(&record, self.config.fallback_year()));
            batch.bib_entries.push(render_orcid_entry(
                &raw_entry,
                &record.title,
                self.config.key_prefix(),
                self.config.fallback_year(),
            ));

            let preview: String = record.title.chars().take(40).collect();
            tracing::info!("  ✨ Processed: {}...", preview);
            batch.publications.push(record);
        }

        sort_by_release_desc(&mut batch.cv_entries);
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
        } else {
            self.write_bibliography(&batch.bib_entries).await?;
            summary.outputs.push(self.config.bib_file().to_string());
        }

        // 沒有任何作品時保留原本的 CV
        if !batch.cv_entries.is_empty() && self.update_cv(&batch).await? {
            summary.outputs.push(self.config.cv_file().to_string());
        }

        Ok(summary)
    }
}
