//! Partner CRUD (§3.1 `Partner`, §4.3 `partner.update`, §6.2).

pub mod domain;
pub mod repo;
pub mod routes;
pub mod service;

pub use domain::PartnerResponse;
pub use service::PartnersService;
