//! Shared-link CRUD (§3.1 `SharedLink`/`SharedLinkAsset`, §3.2 invariant 7,
//! §6.2). Management endpoints only — resolving a link as a principal for
//! an incoming request is `modules::auth`'s concern.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::SharedLinkResponse;
pub use service::SharedLinksService;
