pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::SyncConfig;

pub use adapters::{orcid::OrcidClient, scholar::HttpScholarClient, storage::LocalStorage};
pub use app::pipelines::{
    citations_pipeline::CitationsPipeline, orcid_pipeline::OrcidSyncPipeline,
    scholar_pipeline::ScholarSyncPipeline,
};
pub use core::etl::SyncEngine;
pub use utils::error::{Result, SyncError};
