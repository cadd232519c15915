//! Repository for the `images` and `movie_images` tables.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::Image;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, path, created_at";

/// Provides operations for movie images and their movie links.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert an image row and link it to `movie_id` inside an open transaction.
    pub(crate) async fn insert_for_movie(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        path: &str,
    ) -> Result<Image, sqlx::Error> {
        let query = format!("INSERT INTO images (path) VALUES ($1) RETURNING {COLUMNS}");
        let image = sqlx::query_as::<_, Image>(&query)
            .bind(path)
            .fetch_one(&mut **tx)
            .await?;

        sqlx::query("INSERT INTO movie_images (movie_id, image_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(image.id)
            .execute(&mut **tx)
            .await?;

        Ok(image)
    }

    /// Find an image by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the images attached to a movie, oldest first.
    pub async fn list_for_movie(pool: &PgPool, movie_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT i.id, i.path, i.created_at
             FROM images i
             JOIN movie_images mi ON mi.image_id = i.id
             WHERE mi.movie_id = $1
             ORDER BY i.id",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Remove the link between `image_id` and `movie_id` and delete the image
    /// row, in one transaction.
    ///
    /// Returns the deleted image, or `None` (and changes nothing) when the
    /// image is not attached to that movie.
    pub async fn delete_for_movie(
        pool: &PgPool,
        image_id: DbId,
        movie_id: DbId,
    ) -> Result<Option<Image>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let unlinked =
            sqlx::query("DELETE FROM movie_images WHERE image_id = $1 AND movie_id = $2")
                .bind(image_id)
                .bind(movie_id)
                .execute(&mut *tx)
                .await?;
        if unlinked.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!("DELETE FROM images WHERE id = $1 RETURNING {COLUMNS}");
        let image = sqlx::query_as::<_, Image>(&query)
            .bind(image_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(image)
    }
}
