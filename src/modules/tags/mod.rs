//! Tag CRUD (§3.1 `Tag`/`TagAsset`, §6.2) — mechanical, owner-only; tags
//! carry no AccessGuard permission since spec.md's §4.3 table has no
//! `tag.*` entry.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::TagResponse;
pub use service::TagsService;
