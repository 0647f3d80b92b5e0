pub mod access;
pub mod activity;
pub mod albums;
pub mod assets;
pub mod auth;
pub mod memories;
pub mod partners;
pub mod shared_links;
pub mod stacks;
pub mod sync;
pub mod tags;
pub mod timeline;
pub mod trash;
