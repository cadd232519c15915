use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelbase_core::error::CoreError;
use serde_json::json;

/// Error type shared by services, extractors and handlers.
///
/// Domain failures travel as [`CoreError`]; the remaining variants cover
/// what only the HTTP layer can produce. Every variant renders as
/// `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request could not be read (malformed multipart, bad encoding).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(validation_message(&errors)))
    }
}

/// A response-ready triple: status, machine code, client message.
type ErrorParts = (StatusCode, &'static str, String);

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

fn core_parts(core: &CoreError) -> ErrorParts {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        // Empty listings are reported as 404 with their own code.
        CoreError::NoResults(_) => (StatusCode::NOT_FOUND, "NO_RESULTS", core.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

fn internal(msg: &str) -> ErrorParts {
    tracing::error!(error = %msg, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a sqlx error to a response.
///
/// The services check uniqueness and ranges before writing, so constraint
/// violations only surface here when two requests race. Known catalog
/// constraints get the same message the service-level check would give.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            );
        }
        return internal(&err.to_string());
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        // unique_violation
        Some("23505") if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            conflict_message(constraint),
        ),
        // check_violation
        Some("23514") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            check_message(constraint),
        ),
        _ => internal(&db_err.to_string()),
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_movies_name" => "A movie with this name already exists".into(),
        "uq_users_username" => "Username is already taken".into(),
        "uq_comments_user_description" => "You have already posted an identical comment".into(),
        "uq_movie_ratings_movie_user" => "You have already rated this movie".into(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

fn check_message(constraint: &str) -> String {
    match constraint {
        "ck_ratings_score" => "Rating must be between 1 and 10".into(),
        "ck_movies_length" => "Length must not be negative".into(),
        other => format!("Value violates check constraint: {other}"),
    }
}

/// Flatten `validator` errors into one sentence per failed rule, in field
/// order.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join(". ")
}
