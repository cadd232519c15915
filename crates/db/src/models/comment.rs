//! Comment entity model and read projections.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub user_id: DbId,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment as listed under its movie, with the author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieComment {
    pub id: DbId,
    pub user: String,
    pub description: String,
}

/// A comment as listed in its author's history, with the movie name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserComment {
    pub comment_id: DbId,
    pub movie_id: DbId,
    pub movie: String,
    pub comment: String,
}
