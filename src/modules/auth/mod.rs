//! §6.1 authentication surface: the priority-chain credential resolver, plus
//! session/api-key/shared-link issuance. Admin-user CRUD itself is out of
//! scope (§1) — this module only resolves *who is calling*.

pub mod domain;
pub mod extractor;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::{AuthContext, Principal};
