//! SyncEngine (§4.6) — the third and largest of the three subsystems
//! spec.md calls "the core".

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::{SyncEntityType, SyncLine};
pub use service::SyncService;
