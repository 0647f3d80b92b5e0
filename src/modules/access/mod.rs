//! AccessGuard (§4.3): the permission algebra gating every asset/album
//! operation. This is one of the three subsystems spec.md calls "the core".

pub mod domain;
pub mod guard;
pub mod queries;

pub use domain::Permission;
pub use guard::AccessGuard;
