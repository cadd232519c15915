//! Request handlers.
//!
//! Each submodule provides thin async handler functions for one resource.
//! Handlers extract and shape input, delegate to the services in
//! [`crate::services`] and wrap results in [`DataResponse`](crate::response::DataResponse).

pub mod auth;
pub mod comments;
pub mod images;
pub mod me;
pub mod movies;
pub mod ratings;
