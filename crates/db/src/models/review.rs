//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A review joined with its author's username.
///
/// `author` and `title` are server-assigned: the author comes from the
/// authenticated user and the title from the request path.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub text: String,
    pub score: i32,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author username.
    pub author: String,
    #[serde(rename = "title")]
    pub title_id: DbId,
    pub pub_date: Timestamp,
}

/// DTO for creating a review.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub text: String,
    pub score: i32,
}

/// DTO for a partial review update.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}
