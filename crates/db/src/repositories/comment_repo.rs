//! Repository for the `comments` and `movie_comments` tables.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, MovieComment, UserComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, description, created_at, updated_at";

/// Provides CRUD operations for comments and their movie links.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment and link it to `movie_id` in one transaction.
    pub async fn create_for_movie(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
        description: &str,
    ) -> Result<Comment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO comments (user_id, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(user_id)
            .bind(description)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO movie_comments (movie_id, comment_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(comment.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    /// Find a comment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `user_id` already has a comment with exactly this body on any
    /// movie, ignoring the comment `exclude_id` when given.
    pub async fn body_exists_for_user(
        pool: &PgPool,
        user_id: DbId,
        description: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM comments
                WHERE user_id = $1 AND description = $2
                  AND ($3::BIGINT IS NULL OR id <> $3)
             )",
        )
        .bind(user_id)
        .bind(description)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Replace the body of a comment owned by `user_id`.
    ///
    /// Returns `None` if no such comment exists for that user.
    pub async fn update_description(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        description: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET description = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(user_id)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment by ID. The movie link is removed by cascade.
    ///
    /// Returns `true` if a comment was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the comments posted on a movie with their authors, oldest first.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<MovieComment>, sqlx::Error> {
        sqlx::query_as::<_, MovieComment>(
            "SELECT c.id, u.username AS \"user\", c.description
             FROM movie_comments mc
             JOIN comments c ON c.id = mc.comment_id
             JOIN users u ON u.id = c.user_id
             WHERE mc.movie_id = $1
             ORDER BY c.id",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// List every comment written by a user with the commented movie's name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserComment>, sqlx::Error> {
        sqlx::query_as::<_, UserComment>(
            "SELECT c.id AS comment_id, m.id AS movie_id, m.name AS movie,
                    c.description AS comment
             FROM comments c
             JOIN movie_comments mc ON mc.comment_id = c.id
             JOIN movies m ON m.id = mc.movie_id
             WHERE c.user_id = $1
             ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
