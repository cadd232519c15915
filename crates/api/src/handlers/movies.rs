//! Handlers for the `/movies` resource.
//!
//! Create and update take `multipart/form-data` with the scalar fields plus
//! any number of image files.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_core::error::CoreError;
use reelbase_core::images::ImageUpload;
use reelbase_core::types::DbId;
use reelbase_db::models::movie::{MovieOrder, MovieWithImages};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::movie_service::MovieFields;
use crate::services::MovieService;
use crate::state::AppState;

type MovieList = Json<DataResponse<Vec<MovieWithImages>>>;

/// Query parameters for `GET /movies/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
}

/// GET /api/v1/movies
pub async fn list(State(state): State<AppState>) -> AppResult<MovieList> {
    let movies = MovieService::get_all_movies(&state.pool).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/v1/movies/search?name=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<MovieList> {
    let movies = MovieService::get_movies_by_name(&state.pool, &params.name).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/v1/movies/ordered-by-release-date-asc
pub async fn ordered_by_release_date_asc(State(state): State<AppState>) -> AppResult<MovieList> {
    ordered(&state, MovieOrder::ReleaseDateAsc).await
}

/// GET /api/v1/movies/ordered-by-release-date-desc
pub async fn ordered_by_release_date_desc(State(state): State<AppState>) -> AppResult<MovieList> {
    ordered(&state, MovieOrder::ReleaseDateDesc).await
}

/// GET /api/v1/movies/ordered-by-name-asc
pub async fn ordered_by_name_asc(State(state): State<AppState>) -> AppResult<MovieList> {
    ordered(&state, MovieOrder::NameAsc).await
}

/// GET /api/v1/movies/ordered-by-name-desc
pub async fn ordered_by_name_desc(State(state): State<AppState>) -> AppResult<MovieList> {
    ordered(&state, MovieOrder::NameDesc).await
}

async fn ordered(state: &AppState, order: MovieOrder) -> AppResult<MovieList> {
    let movies = MovieService::get_ordered_movies(&state.pool, order).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MovieWithImages>>> {
    let movie = MovieService::get_movie(&state.pool, id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// POST /api/v1/movies (multipart, admin only)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MovieWithImages>>)> {
    let form = read_movie_form(multipart).await?;
    let movie =
        MovieService::add_movie(&state.pool, &*state.image_store, form.fields, &form.uploads)
            .await?;
    tracing::debug!(
        movie_id = movie.id,
        admin_id = admin.user_id,
        admin = %admin.username,
        "Movie created via API"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: movie })))
}

/// PUT /api/v1/movies/{id} (multipart, admin only)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<MovieWithImages>>> {
    let form = read_movie_form(multipart).await?;
    let movie = MovieService::update_movie(
        &state.pool,
        &*state.image_store,
        id,
        form.fields,
        &form.uploads,
    )
    .await?;
    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{id} (admin only)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    MovieService::delete_movie(&state.pool, &*state.image_store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Parsed movie form: scalar fields plus raw uploads.
struct MovieForm {
    fields: MovieFields,
    uploads: Vec<ImageUpload>,
}

/// Read every part of a movie form. Unknown parts are ignored.
///
/// Field names are accepted in camelCase and snake_case; files may be sent
/// as `files`, `files[]` or `file`.
async fn read_movie_form(mut multipart: Multipart) -> AppResult<MovieForm> {
    let mut fields = MovieFields::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" | "files[]" | "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                uploads.push(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => fields.name = Some(read_text(field).await?),
            "description" => fields.description = Some(read_text(field).await?),
            "releaseDate" | "release_date" => fields.release_date = Some(read_text(field).await?),
            "directorName" | "director_name" => {
                fields.director_name = Some(read_text(field).await?)
            }
            "length" => fields.length = parse_length(&read_text(field).await?)?,
            _ => {} // ignore unknown fields
        }
    }

    Ok(MovieForm { fields, uploads })
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// A blank length means "not provided".
fn parse_length(raw: &str) -> AppResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Length must be a whole number of minutes (got '{raw}')"
        )))
    })
}
