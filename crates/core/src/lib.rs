//! Domain types and rules for the reelbase movie catalog.
//!
//! Nothing in this crate touches the database: it holds the error taxonomy,
//! catalog validation rules, upload checks and the image store abstraction.

pub mod catalog;
pub mod error;
pub mod image_store;
pub mod images;
pub mod roles;
pub mod types;
