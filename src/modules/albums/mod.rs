//! Album CRUD (§3.1 `Album`/`AlbumAsset`/`AlbumUser`, §6.2) — a mechanical
//! wrapper over AccessGuard and the relational model, not one of spec.md's
//! three core subsystems.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::AlbumResponse;
pub use service::AlbumsService;
