//! sea-orm entity models for the relational store (RelDB).
//!
//! Grounded in the teacher's `modules::*::adapter::outgoing::db::sea_orm_entity`
//! layout (`DeriveEntityModel` + `Relation`/`Related`), but collapsed into one
//! `src/entity` tree: almost every core module (access, ingest, sync, timeline)
//! reads across asset/album/user boundaries, so per-module entity ownership
//! would mean duplicate model definitions rather than one shared source of
//! truth. See DESIGN.md.

pub mod activity;
pub mod album;
pub mod album_asset;
pub mod album_user;
pub mod api_key;
pub mod asset;
pub mod asset_exif;
pub mod asset_file;
pub mod asset_metadata;
pub mod audit;
pub mod memory;
pub mod memory_asset;
pub mod partner;
pub mod session;
pub mod session_sync_checkpoint;
pub mod shared_link;
pub mod shared_link_asset;
pub mod stack;
pub mod system_metadata;
pub mod tag;
pub mod tag_asset;
pub mod user;
