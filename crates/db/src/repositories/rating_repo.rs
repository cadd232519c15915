//! Repository for the `ratings` and `movie_ratings` tables.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::{Rating, UserRating};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, score, created_at, updated_at";

/// Provides CRUD operations for ratings and their movie links.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a rating by `user_id` for `movie_id` and link it, in one
    /// transaction.
    ///
    /// Returns `None` (and writes nothing) if the user already rated the
    /// movie. A concurrent duplicate that slips past the check fails on
    /// `uq_movie_ratings_movie_user`.
    pub async fn create_for_movie(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
        score: i32,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (already_rated,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM movie_ratings WHERE movie_id = $1 AND user_id = $2
             )",
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_rated {
            return Ok(None);
        }

        let query =
            format!("INSERT INTO ratings (user_id, score) VALUES ($1, $2) RETURNING {COLUMNS}");
        let rating = sqlx::query_as::<_, Rating>(&query)
            .bind(user_id)
            .bind(score)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO movie_ratings (movie_id, rating_id, user_id) VALUES ($1, $2, $3)",
        )
        .bind(movie_id)
        .bind(rating.id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(rating))
    }

    /// Find a rating by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the score of a rating owned by `user_id`.
    ///
    /// Returns `None` if no such rating exists for that user.
    pub async fn update_score(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        score: i32,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!(
            "UPDATE ratings SET score = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .bind(user_id)
            .bind(score)
            .fetch_optional(pool)
            .await
    }

    /// List every rating given by a user with the rated movie's name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserRating>, sqlx::Error> {
        sqlx::query_as::<_, UserRating>(
            "SELECT r.id AS rating_id, m.id AS movie_id, m.name AS movie, r.score AS rating
             FROM ratings r
             JOIN movie_ratings mr ON mr.rating_id = r.id
             JOIN movies m ON m.id = mr.movie_id
             WHERE r.user_id = $1
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
