pub mod bibtex;
pub mod citations;
pub mod cv;
pub mod dedupe;
pub mod etl;
pub mod keys;
pub mod normalize;

pub use crate::domain::model::{CvPublication, PublicationRecord, RawRecord, SyncBatch, SyncSummary};
pub use crate::domain::ports::{BibMode, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
