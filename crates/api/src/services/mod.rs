//! Aggregation services.
//!
//! Each service is a zero-sized struct whose async methods compose one or
//! more repository calls and return [`AppResult`](crate::error::AppResult),
//! so handlers stay thin.

pub mod movie_service;
pub mod user_service;

pub use movie_service::MovieService;
pub use user_service::UserService;
