// Adapters layer: concrete implementations for external systems (storage, http, remote services).

pub mod http;
pub mod orcid;
pub mod scholar;
pub mod storage;
