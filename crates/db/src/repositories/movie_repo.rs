//! Repository for the `movies` table and the movie-level aggregate writes
//! that also touch `images`, `movie_images`, comments and ratings.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::Image;
use crate::models::movie::{CreateMovie, Movie, MovieOrder, MovieWithImages, UpdateMovie};
use crate::repositories::ImageRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, release_date, director_name, length, \
                        created_at, updated_at";

/// Projection of a movie plus its image locators. Callers append a `WHERE`
/// clause (optional), then `GROUP BY m.id` and an `ORDER BY`.
const WITH_IMAGES_SELECT: &str = "\
    SELECT m.id, m.name, m.description, m.release_date, m.director_name, m.length, \
           COALESCE(ARRAY_AGG(i.path ORDER BY i.id) FILTER (WHERE i.id IS NOT NULL), '{}') \
               AS images \
    FROM movies m \
    LEFT JOIN movie_images mi ON mi.movie_id = m.id \
    LEFT JOIN images i ON i.id = mi.image_id";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie without images.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let (movie, _) = Self::create_with_images(pool, input, &[]).await?;
        Ok(movie)
    }

    /// Insert a movie and, in the same transaction, one image row plus one
    /// `movie_images` link per entry of `image_paths`.
    pub async fn create_with_images(
        pool: &PgPool,
        input: &CreateMovie,
        image_paths: &[String],
    ) -> Result<(Movie, Vec<Image>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movies (name, description, release_date, director_name, length) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.release_date)
            .bind(&input.director_name)
            .bind(input.length)
            .fetch_one(&mut *tx)
            .await?;

        let mut images = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            images.push(ImageRepo::insert_for_movie(&mut tx, movie.id, path).await?);
        }

        tx.commit().await?;
        Ok((movie, images))
    }

    /// Find a movie by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie by ID together with its image locators.
    pub async fn find_with_images(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithImages>, sqlx::Error> {
        let query = format!("{WITH_IMAGES_SELECT} WHERE m.id = $1 GROUP BY m.id");
        sqlx::query_as::<_, MovieWithImages>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a movie with exactly this name exists (case-sensitive),
    /// ignoring the movie `exclude_id` when given.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM movies
                WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List every movie with its images in the requested order.
    pub async fn list_with_images(
        pool: &PgPool,
        order: MovieOrder,
    ) -> Result<Vec<MovieWithImages>, sqlx::Error> {
        let query = format!("{WITH_IMAGES_SELECT} GROUP BY m.id ORDER BY {}", order.order_by());
        sqlx::query_as::<_, MovieWithImages>(&query)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search on the movie name.
    ///
    /// `STRPOS` is used instead of `LIKE` so `%` and `_` in the term match
    /// literally. An empty term matches every movie.
    pub async fn search_by_name(
        pool: &PgPool,
        term: &str,
    ) -> Result<Vec<MovieWithImages>, sqlx::Error> {
        let query = format!(
            "{WITH_IMAGES_SELECT} \
             WHERE STRPOS(LOWER(m.name), LOWER($1)) > 0 \
             GROUP BY m.id \
             ORDER BY {}",
            MovieOrder::Id.order_by()
        );
        sqlx::query_as::<_, MovieWithImages>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update and append new images in one transaction.
    /// Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` (and writes nothing) if no movie with `id` exists.
    pub async fn update_with_images(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
        image_paths: &[String],
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE movies SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                release_date = COALESCE($4, release_date),
                director_name = COALESCE($5, director_name),
                length = COALESCE($6, length)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(movie) = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.release_date)
            .bind(&input.director_name)
            .bind(input.length)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        for path in image_paths {
            ImageRepo::insert_for_movie(&mut tx, movie.id, path).await?;
        }

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Delete a movie together with everything hanging off it: its
    /// comments, ratings, images and all association rows.
    ///
    /// Returns the locators of the deleted images so the caller can remove
    /// the stored files, or `None` if the movie does not exist.
    pub async fn delete_cascade(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        sqlx::query(
            "DELETE FROM comments
             WHERE id IN (SELECT comment_id FROM movie_comments WHERE movie_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM ratings
             WHERE id IN (SELECT rating_id FROM movie_ratings WHERE movie_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let paths: Vec<(String,)> = sqlx::query_as(
            "DELETE FROM images
             WHERE id IN (SELECT image_id FROM movie_images WHERE movie_id = $1)
             RETURNING path",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(movie_id = id, images = paths.len(), "Movie rows deleted");
        Ok(Some(paths.into_iter().map(|(p,)| p).collect()))
    }
}
