//! Activity CRUD (§3.1 `Activity`, §4.3 `activity.create`, §6.2).

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::ActivityResponse;
pub use service::ActivityService;
