//! Movie aggregation service: catalog CRUD plus the comments, ratings and
//! images that hang off a movie.
//!
//! Every multi-row write goes through a single repository transaction.
//! Image files are written to the [`ImageStore`] before the transaction and
//! removed again (best-effort) when it fails.

use reelbase_core::catalog::{
    non_blank, parse_release_date, require_text, validate_comment_body, validate_length,
    validate_rating_score,
};
use reelbase_core::error::CoreError;
use reelbase_core::image_store::ImageStore;
use reelbase_core::images::{unique_file_name, ImageUpload};
use reelbase_core::types::DbId;
use reelbase_db::models::comment::{Comment, MovieComment};
use reelbase_db::models::movie::{CreateMovie, MovieOrder, MovieWithImages, UpdateMovie};
use reelbase_db::models::rating::Rating;
use reelbase_db::repositories::{CommentRepo, ImageRepo, MovieRepo, RatingRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Scalar movie fields as submitted by a client.
///
/// Text fields are raw; blank values count as "not provided".
#[derive(Debug, Clone, Default)]
pub struct MovieFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub director_name: Option<String>,
    pub length: Option<i32>,
}

/// Catalog operations over movies and their dependents.
pub struct MovieService;

impl MovieService {
    // -----------------------------------------------------------------------
    // Movies
    // -----------------------------------------------------------------------

    /// Create a movie and attach every valid upload.
    ///
    /// Invalid uploads and uploads the store fails to write are skipped.
    pub async fn add_movie(
        pool: &PgPool,
        store: &dyn ImageStore,
        fields: MovieFields,
        uploads: &[ImageUpload],
    ) -> AppResult<MovieWithImages> {
        let name = require_text("name", fields.name.as_deref())?.to_string();
        let description = require_text("description", fields.description.as_deref())?;
        let release_date =
            parse_release_date(require_text("releaseDate", fields.release_date.as_deref())?)?;
        let director_name = require_text("directorName", fields.director_name.as_deref())?;
        let length = fields.length.unwrap_or(0);
        validate_length(length)?;

        if MovieRepo::name_exists(pool, &name, None).await? {
            return Err(duplicate_movie(&name));
        }

        let input = CreateMovie {
            name,
            description: description.to_string(),
            release_date,
            director_name: director_name.to_string(),
            length,
        };

        let locators = store_uploads(store, uploads).await;
        let (movie, images) = match MovieRepo::create_with_images(pool, &input, &locators).await {
            Ok(created) => created,
            Err(e) => {
                remove_files(store, &locators).await;
                return Err(e.into());
            }
        };

        tracing::info!(movie_id = movie.id, images = images.len(), "Movie created");
        Self::get_movie(pool, movie.id).await
    }

    /// Apply the non-blank fields of `fields` and append every valid upload.
    ///
    /// Nothing is written when any provided field is invalid.
    pub async fn update_movie(
        pool: &PgPool,
        store: &dyn ImageStore,
        id: DbId,
        fields: MovieFields,
        uploads: &[ImageUpload],
    ) -> AppResult<MovieWithImages> {
        if MovieRepo::find_by_id(pool, id).await?.is_none() {
            return Err(movie_not_found(id));
        }

        let name = non_blank(fields.name);
        if let Some(name) = &name {
            if MovieRepo::name_exists(pool, name, Some(id)).await? {
                return Err(duplicate_movie(name));
            }
        }
        let release_date = non_blank(fields.release_date)
            .map(|raw| parse_release_date(&raw))
            .transpose()?;
        if let Some(length) = fields.length {
            validate_length(length)?;
        }

        let input = UpdateMovie {
            name,
            description: non_blank(fields.description),
            release_date,
            director_name: non_blank(fields.director_name),
            length: fields.length,
        };

        let locators = store_uploads(store, uploads).await;
        match MovieRepo::update_with_images(pool, id, &input, &locators).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                remove_files(store, &locators).await;
                return Err(movie_not_found(id));
            }
            Err(e) => {
                remove_files(store, &locators).await;
                return Err(e.into());
            }
        }

        tracing::info!(movie_id = id, new_images = locators.len(), "Movie updated");
        Self::get_movie(pool, id).await
    }

    /// Delete a movie with its comments, ratings and images, then remove the
    /// stored image files.
    pub async fn delete_movie(pool: &PgPool, store: &dyn ImageStore, id: DbId) -> AppResult<()> {
        let locators = MovieRepo::delete_cascade(pool, id)
            .await?
            .ok_or_else(|| movie_not_found(id))?;

        remove_files(store, &locators).await;
        tracing::info!(movie_id = id, images = locators.len(), "Movie deleted");
        Ok(())
    }

    pub async fn get_movie(pool: &PgPool, id: DbId) -> AppResult<MovieWithImages> {
        MovieRepo::find_with_images(pool, id)
            .await?
            .ok_or_else(|| movie_not_found(id))
    }

    pub async fn get_all_movies(pool: &PgPool) -> AppResult<Vec<MovieWithImages>> {
        Self::get_ordered_movies(pool, MovieOrder::Id).await
    }

    /// Case-insensitive substring search on the movie name.
    pub async fn get_movies_by_name(pool: &PgPool, term: &str) -> AppResult<Vec<MovieWithImages>> {
        non_empty(MovieRepo::search_by_name(pool, term).await?, "movies")
    }

    pub async fn get_ordered_movies(
        pool: &PgPool,
        order: MovieOrder,
    ) -> AppResult<Vec<MovieWithImages>> {
        non_empty(MovieRepo::list_with_images(pool, order).await?, "movies")
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// List a movie's comments. An existing movie without comments yields an
    /// empty list.
    pub async fn get_movie_comments(
        pool: &PgPool,
        movie_id: DbId,
    ) -> AppResult<Vec<MovieComment>> {
        ensure_movie_exists(pool, movie_id).await?;
        Ok(CommentRepo::list_for_movie(pool, movie_id).await?)
    }

    /// Post a comment. A user may not post the same body twice, on any movie.
    pub async fn add_comment(
        pool: &PgPool,
        body: &str,
        user_id: DbId,
        movie_id: DbId,
    ) -> AppResult<Comment> {
        let body = validate_comment_body(body)?;
        ensure_movie_exists(pool, movie_id).await?;

        if CommentRepo::body_exists_for_user(pool, user_id, &body, None).await? {
            return Err(duplicate_comment());
        }

        let comment = CommentRepo::create_for_movie(pool, user_id, movie_id, &body).await?;
        tracing::info!(comment_id = comment.id, movie_id, user_id, "Comment added");
        Ok(comment)
    }

    /// Replace the body of a comment owned by `user_id`.
    pub async fn update_comment(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        body: &str,
    ) -> AppResult<Comment> {
        let body = validate_comment_body(body)?;

        let existing = CommentRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| comment_not_found(id))?;
        if existing.user_id != user_id {
            return Err(CoreError::Forbidden("You can only edit your own comments".into()).into());
        }
        if CommentRepo::body_exists_for_user(pool, user_id, &body, Some(id)).await? {
            return Err(duplicate_comment());
        }

        let comment = CommentRepo::update_description(pool, id, user_id, &body)
            .await?
            .ok_or_else(|| comment_not_found(id))?;
        tracing::info!(comment_id = id, user_id, "Comment updated");
        Ok(comment)
    }

    /// Delete a comment. Allowed for its author and for administrators.
    pub async fn delete_comment(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        is_admin: bool,
    ) -> AppResult<()> {
        let existing = CommentRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| comment_not_found(id))?;
        if existing.user_id != user_id && !is_admin {
            return Err(
                CoreError::Forbidden("You can only delete your own comments".into()).into(),
            );
        }

        if !CommentRepo::delete(pool, id).await? {
            return Err(comment_not_found(id));
        }
        tracing::info!(comment_id = id, user_id, "Comment deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ratings
    // -----------------------------------------------------------------------

    /// Rate a movie. Each user rates a given movie at most once.
    pub async fn add_rating(
        pool: &PgPool,
        movie_id: DbId,
        score: i32,
        user_id: DbId,
    ) -> AppResult<Rating> {
        validate_rating_score(score)?;
        ensure_movie_exists(pool, movie_id).await?;

        let rating = RatingRepo::create_for_movie(pool, user_id, movie_id, score)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "You have already rated this movie".into(),
                ))
            })?;
        tracing::info!(rating_id = rating.id, movie_id, user_id, score, "Rating added");
        Ok(rating)
    }

    /// Change the score of a rating owned by `user_id`.
    pub async fn update_rating(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        score: i32,
    ) -> AppResult<Rating> {
        validate_rating_score(score)?;

        let existing = RatingRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| rating_not_found(id))?;
        if existing.user_id != user_id {
            return Err(CoreError::Forbidden("You can only edit your own ratings".into()).into());
        }

        let rating = RatingRepo::update_score(pool, id, user_id, score)
            .await?
            .ok_or_else(|| rating_not_found(id))?;
        tracing::info!(rating_id = id, user_id, score, "Rating updated");
        Ok(rating)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Detach and delete an image of a movie, then remove its stored file.
    pub async fn delete_image(
        pool: &PgPool,
        store: &dyn ImageStore,
        image_id: DbId,
        movie_id: DbId,
    ) -> AppResult<()> {
        let image = ImageRepo::delete_for_movie(pool, image_id, movie_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Image",
                id: image_id,
            }))?;

        remove_files(store, std::slice::from_ref(&image.path)).await;
        tracing::info!(image_id, movie_id, "Image deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn movie_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

fn comment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}

fn rating_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Rating", id })
}

fn duplicate_movie(name: &str) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "A movie named '{name}' already exists"
    )))
}

fn duplicate_comment() -> AppError {
    AppError::Core(CoreError::Conflict(
        "You have already posted an identical comment".into(),
    ))
}

async fn ensure_movie_exists(pool: &PgPool, movie_id: DbId) -> AppResult<()> {
    match MovieRepo::find_by_id(pool, movie_id).await? {
        Some(_) => Ok(()),
        None => Err(movie_not_found(movie_id)),
    }
}

/// Turn an empty listing into [`CoreError::NoResults`].
pub(crate) fn non_empty<T>(rows: Vec<T>, entity: &'static str) -> AppResult<Vec<T>> {
    if rows.is_empty() {
        Err(CoreError::NoResults(entity).into())
    } else {
        Ok(rows)
    }
}

/// Write every valid upload to the store and return the locators that were
/// written.
async fn store_uploads(store: &dyn ImageStore, uploads: &[ImageUpload]) -> Vec<String> {
    let mut locators = Vec::with_capacity(uploads.len());
    for upload in uploads {
        if !upload.is_valid() {
            tracing::warn!(
                file_name = %upload.file_name,
                size = upload.bytes.len(),
                "Skipping unsupported or empty image upload"
            );
            continue;
        }
        let file_name = unique_file_name(&upload.file_name);
        match store.store(&file_name, &upload.bytes).await {
            Ok(locator) => locators.push(locator),
            Err(e) => {
                tracing::warn!(error = %e, file_name = %upload.file_name, "Failed to store image");
            }
        }
    }
    locators
}

async fn remove_files(store: &dyn ImageStore, locators: &[String]) {
    for locator in locators {
        if let Err(e) = store.remove(locator).await {
            tracing::warn!(error = %e, %locator, "Failed to remove image file");
        }
    }
}
