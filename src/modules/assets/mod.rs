//! Ingest (§4.4) and Retrieve (§4.5) — the second of the three subsystems
//! spec.md calls "the core".

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::{NewAssetInput, ThumbnailSize, UploadOutcome};
pub use service::AssetsService;
