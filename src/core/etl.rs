use crate::domain::model::SyncSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Drives one pipeline through extract, transform and load, in order.
pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<SyncSummary> {
        tracing::info!("Starting publication sync...");

        // Extract
        let raw_records = self.pipeline.extract().await?;
        tracing::info!("📦 Fetched {} records", raw_records.len());

        // Transform
        let batch = self.pipeline.transform(raw_records).await?;
        tracing::info!(
            "Normalized {} records ({} skipped)",
            batch.publications.len(),
            batch.skipped_titles.len()
        );

        // Load
        let summary = self.pipeline.load(batch).await?;
        for output in &summary.outputs {
            tracing::info!("📝 Updated {}", output);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PublicationRecord, RawRecord, SyncBatch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        phases: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Vec<RawRecord>> {
            self.phases.lock().unwrap().push("extract");
            Ok(vec![RawRecord::default(), RawRecord::default()])
        }

        async fn transform(&self, data: Vec<RawRecord>) -> Result<SyncBatch> {
            self.phases.lock().unwrap().push("transform");
            let publications = data
                .iter()
                .map(|_| PublicationRecord {
                    title: "T".to_string(),
                    authors: vec![],
                    year: None,
                    venue: None,
                    volume: None,
                    pages: None,
                    external_id: None,
                    citations: None,
                    source_id: None,
                })
                .collect();
            Ok(SyncBatch {
                publications,
                ..Default::default()
            })
        }

        async fn load(&self, batch: SyncBatch) -> Result<SyncSummary> {
            self.phases.lock().unwrap().push("load");
            Ok(SyncSummary {
                added: batch.publications.len(),
                skipped: 0,
                outputs: vec!["papers.bib".to_string()],
            })
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let engine = SyncEngine::new(RecordingPipeline {
            phases: Mutex::new(Vec::new()),
        });

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.added, 2);
        assert_eq!(
            *engine.pipeline.phases.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }
}
