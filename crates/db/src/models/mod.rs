//! Row models and DTOs, one module per table family.

pub mod comment;
pub mod image;
pub mod movie;
pub mod rating;
pub mod role;
pub mod user;
