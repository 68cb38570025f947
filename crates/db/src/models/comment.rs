//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author username.
    pub author: String,
    #[serde(rename = "review")]
    pub review_id: DbId,
    pub pub_date: Timestamp,
}
