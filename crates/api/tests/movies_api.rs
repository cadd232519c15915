//! HTTP-level integration tests for the movie catalog endpoints.
//!
//! Covers creation with image uploads, partial updates, cascading delete,
//! name search, the ordered listings and image removal.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_token, body_json, create_movie, delete_auth, get, movie_form, multipart_auth,
    post_json_auth, register, MultipartForm,
};
use sqlx::PgPool;

fn names(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Creating a movie stores valid images and skips unsupported or empty ones.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_movie_with_images(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);

    let form = movie_form("Inception", "2010-07-16")
        .file("files", "poster.png", b"\x89PNG-bytes")
        .file("files[]", "still.JPG", b"jpeg-bytes")
        .file("files", "notes.txt", b"not an image")
        .file("files", "empty.png", b"");
    let response =
        multipart_auth(test_app.app(), Method::POST, "/api/v1/movies", form, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Inception");
    assert_eq!(json["data"]["release_date"], "2010-07-16");
    assert_eq!(json["data"]["length"], 120);

    let images = json["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    for image in images {
        let locator = image.as_str().unwrap();
        assert!(locator.starts_with("http://localhost:3000/images/movies/"));
    }
    assert!(images[0].as_str().unwrap().ends_with("_poster.png"));
    assert_eq!(test_app.stored_file_count(), 2);
}

/// Stored images are served back under `/images/movies`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_uploaded_image_is_served(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);

    let form = movie_form("Heat", "1995-12-15").file("file", "poster.png", b"png-bytes");
    let response =
        multipart_auth(test_app.app(), Method::POST, "/api/v1/movies", form, &token).await;
    let json = body_json(response).await;
    let locator = json["data"]["images"][0].as_str().unwrap().to_string();
    let path = locator.strip_prefix(common::PUBLIC_BASE_URL).unwrap();

    let response = get(test_app.app(), path).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A second movie with the same name is rejected with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_duplicate_name_conflict(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    create_movie(test_app.app(), &token, "Alien", "1979-05-25").await;

    let response = multipart_auth(
        test_app.app(),
        Method::POST,
        "/api/v1/movies",
        movie_form("Alien", "1980-01-01"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Movie names are compared case-sensitively on create.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_name_differing_in_case_succeeds(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    create_movie(test_app.app(), &token, "Alien", "1979-05-25").await;

    let response = multipart_auth(
        test_app.app(),
        Method::POST,
        "/api/v1/movies",
        movie_form("ALIEN", "1979-05-25"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Missing required fields and bad dates are validation errors.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_movie_validation(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);

    let missing_name = MultipartForm::new()
        .text("description", "d")
        .text("releaseDate", "2010-07-16")
        .text("directorName", "Nolan");
    let response = multipart_auth(
        test_app.app(),
        Method::POST,
        "/api/v1/movies",
        missing_name,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "name is required");

    let bad_date = movie_form("Memento", "not-a-date");
    let response =
        multipart_auth(test_app.app(), Method::POST, "/api/v1/movies", bad_date, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let negative_length = MultipartForm::new()
        .text("name", "Tenet")
        .text("description", "d")
        .text("release_date", "2020-08-26")
        .text("director_name", "Nolan")
        .text("length", "-1");
    let response = multipart_auth(
        test_app.app(),
        Method::POST,
        "/api/v1/movies",
        negative_length,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// A created movie is retrievable by id; unknown ids give 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_movie_by_id(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    let id = create_movie(test_app.app(), &token, "Heat", "1995-12-15").await;

    let response = get(test_app.app(), &format!("/api/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Heat");
    assert_eq!(json["data"]["images"], serde_json::json!([]));

    let response = get(test_app.app(), "/api/v1/movies/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// An empty catalog is reported as 404 rather than an empty list.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_empty_catalog(pool: PgPool) {
    let test_app = common::build_test_app(pool);

    let response = get(test_app.app(), "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_RESULTS");
    assert_eq!(json["error"], "No movies found");
}

/// Search matches a case-insensitive substring of the name.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_by_name(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    create_movie(test_app.app(), &token, "X", "2000-01-01").await;
    create_movie(test_app.app(), &token, "The Matrix", "1999-03-31").await;

    let response = get(test_app.app(), "/api/v1/movies/search?name=x").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(names(&json), ["X", "The Matrix"]);

    let response = get(test_app.app(), "/api/v1/movies/search?name=zzz").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Ordered listings sort by the field and keep insertion order on ties.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ordered_listings(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    create_movie(test_app.app(), &token, "Beta", "2001-01-01").await;
    create_movie(test_app.app(), &token, "Alpha", "2001-01-01").await;
    create_movie(test_app.app(), &token, "Gamma", "1990-06-01").await;

    let cases = [
        ("ordered-by-release-date-asc", ["Gamma", "Beta", "Alpha"]),
        ("ordered-by-release-date-desc", ["Beta", "Alpha", "Gamma"]),
        ("ordered-by-name-asc", ["Alpha", "Beta", "Gamma"]),
        ("ordered-by-name-desc", ["Gamma", "Beta", "Alpha"]),
    ];
    for (path, expected) in cases {
        let response = get(test_app.app(), &format!("/api/v1/movies/{path}")).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let json = body_json(response).await;
        assert_eq!(names(&json), expected, "{path}");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Blank fields keep the stored value; non-blank fields replace it; new
/// files are appended.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_movie_partial(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    let id = create_movie(test_app.app(), &token, "Heat", "1995-12-15").await;

    let form = MultipartForm::new()
        .text("name", "")
        .text("description", "A heist film")
        .text("length", "170")
        .file("files", "poster.jpeg", b"jpeg");
    let response = multipart_auth(
        test_app.app(),
        Method::PUT,
        &format!("/api/v1/movies/{id}"),
        form,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Heat");
    assert_eq!(json["data"]["description"], "A heist film");
    assert_eq!(json["data"]["length"], 170);
    assert_eq!(json["data"]["release_date"], "1995-12-15");
    assert_eq!(json["data"]["images"].as_array().unwrap().len(), 1);
}

/// An unparsable release date rejects the whole update.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_bad_date_writes_nothing(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    let id = create_movie(test_app.app(), &token, "Heat", "1995-12-15").await;

    let form = MultipartForm::new()
        .text("description", "changed")
        .text("releaseDate", "someday");
    let response = multipart_auth(
        test_app.app(),
        Method::PUT,
        &format!("/api/v1/movies/{id}"),
        form,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(test_app.app(), &format!("/api/v1/movies/{id}")).await).await;
    assert_eq!(json["data"]["description"], "Heat description");
}

/// Renaming onto another movie's name is a conflict; updating a missing
/// movie is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_conflict_and_missing(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool);
    create_movie(test_app.app(), &token, "Heat", "1995-12-15").await;
    let id = create_movie(test_app.app(), &token, "Ronin", "1998-09-25").await;

    let response = multipart_auth(
        test_app.app(),
        Method::PUT,
        &format!("/api/v1/movies/{id}"),
        MultipartForm::new().text("name", "Heat"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = multipart_auth(
        test_app.app(),
        Method::PUT,
        "/api/v1/movies/9999",
        MultipartForm::new().text("name", "Anything"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Deleting a movie removes it, its dependents and its stored files.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_movie_cascades(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool.clone());

    let form = movie_form("Heat", "1995-12-15").file("files", "poster.png", b"png");
    let response =
        multipart_auth(test_app.app(), Method::POST, "/api/v1/movies", form, &token).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    assert_eq!(test_app.stored_file_count(), 1);

    let (_, user_token) = register(test_app.app(), "alice").await;
    let response = post_json_auth(
        test_app.app(),
        &format!("/api/v1/movies/{id}/comments"),
        serde_json::json!({ "description": "Great film" }),
        &user_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(test_app.app(), &format!("/api/v1/movies/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(test_app.app(), &format!("/api/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test_app.stored_file_count(), 0);

    let (comments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(comments, 0);

    let response = delete_auth(test_app.app(), &format!("/api/v1/movies/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// An image is removed only through the movie it belongs to.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_image(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test_app = common::build_test_app(pool.clone());

    let form = movie_form("Heat", "1995-12-15").file("files", "poster.png", b"png");
    let response =
        multipart_auth(test_app.app(), Method::POST, "/api/v1/movies", form, &token).await;
    let movie_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let other_id = create_movie(test_app.app(), &token, "Ronin", "1998-09-25").await;

    let (image_id,): (i64,) =
        sqlx::query_as("SELECT image_id FROM movie_images WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let response = delete_auth(
        test_app.app(),
        &format!("/api/v1/images/{image_id}?movieId={other_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(
        test_app.app(),
        &format!("/api/v1/images/{image_id}?movieId={movie_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(test_app.stored_file_count(), 0);

    let json = body_json(get(test_app.app(), &format!("/api/v1/movies/{movie_id}")).await).await;
    assert_eq!(json["data"]["images"], serde_json::json!([]));
}
