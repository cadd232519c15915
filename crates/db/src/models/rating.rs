//! Rating entity model and read projections.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub user_id: DbId,
    pub score: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating as listed in its author's history, with the movie name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRating {
    pub rating_id: DbId,
    pub movie_id: DbId,
    pub movie: String,
    pub rating: i32,
}
