//! Trash (§4.8): soft-delete, restore, hard purge — the other half of
//! quota/storage lifecycle that `modules::assets` starts.

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::CountResult;
pub use service::TrashService;
