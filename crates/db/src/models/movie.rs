//! Movie entity model and DTOs.

use chrono::NaiveDate;
use reelbase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub director_name: String,
    /// Runtime in minutes.
    pub length: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Movie projection returned by every catalog read: the scalar fields plus
/// the locators of all attached images, ordered by image id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieWithImages {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub director_name: String,
    pub length: i32,
    pub images: Vec<String>,
}

/// DTO for inserting a movie. Fields are already validated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovie {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub director_name: String,
    pub length: i32,
}

/// DTO for a partial movie update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovie {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub director_name: Option<String>,
    pub length: Option<i32>,
}

/// Sort orders offered by the ordered listing endpoints.
///
/// Rows with equal sort keys keep insertion order (`id ASC` tie-breaker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieOrder {
    /// Insertion order.
    #[default]
    Id,
    ReleaseDateAsc,
    ReleaseDateDesc,
    NameAsc,
    NameDesc,
}

impl MovieOrder {
    /// SQL `ORDER BY` expression for this order, against alias `m`.
    pub fn order_by(self) -> &'static str {
        match self {
            MovieOrder::Id => "m.id ASC",
            MovieOrder::ReleaseDateAsc => "m.release_date ASC, m.id ASC",
            MovieOrder::ReleaseDateDesc => "m.release_date DESC, m.id ASC",
            MovieOrder::NameAsc => "m.name ASC, m.id ASC",
            MovieOrder::NameDesc => "m.name DESC, m.id ASC",
        }
    }
}
