//! Stack CRUD (§3.1 `Stack`, §3.2 invariant 6 "stack primacy", §6.2) —
//! mechanical, owner-only.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::StackResponse;
pub use service::StacksService;
