//! Memory CRUD (§3.1 `Memory`/`MemoryAsset`, §6.2) — mechanical, owner-only.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::MemoryResponse;
pub use service::MemoriesService;
