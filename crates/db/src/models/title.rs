//! Title entity model, presentation shape and DTOs.
//!
//! Titles are written with bare category/genre ids (resolved from slugs by
//! the API layer) and read back with the category and genres nested as
//! `{name, slug}` objects and the average review score attached.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::DbId;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A title joined with its category and its computed rating.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// `AVG(reviews.score)`; `NULL` when the title has no reviews.
    pub rating: Option<f64>,
}

/// A genre attached to a title, as returned by the `title_genres` join.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub name: String,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Nested `{name, slug}` representation of a category or genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugRef {
    pub name: String,
    pub slug: String,
}

/// Title as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<SlugRef>,
    pub category: Option<SlugRef>,
}

impl TitleRow {
    /// Attach the title's genres and shape the row for output.
    pub fn into_response(self, genre: Vec<SlugRef>) -> TitleResponse {
        let category = match (self.category_name, self.category_slug) {
            (Some(name), Some(slug)) => Some(SlugRef { name, slug }),
            _ => None,
        };
        TitleResponse {
            id: self.id,
            name: self.name,
            year: self.year,
            rating: self.rating,
            description: self.description,
            genre,
            category,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a title. Slugs are already resolved to ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for a partial title update. `None` leaves the field unchanged;
/// `genre_ids: Some(..)` replaces the whole genre set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /api/v1/titles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleListParams {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: Option<(&str, &str)>, rating: Option<f64>) -> TitleRow {
        TitleRow {
            id: 1,
            name: "The Hobbit".into(),
            year: 1937,
            description: None,
            category_name: category.map(|(n, _)| n.to_string()),
            category_slug: category.map(|(_, s)| s.to_string()),
            rating,
        }
    }

    #[test]
    fn category_is_nested_as_name_and_slug() {
        let response = row(Some(("Fantasy", "fantasy")), None).into_response(vec![]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["category"], serde_json::json!({"name": "Fantasy", "slug": "fantasy"}));
    }

    #[test]
    fn missing_category_and_rating_serialize_as_null() {
        let json = serde_json::to_value(row(None, None).into_response(vec![])).unwrap();
        assert!(json["category"].is_null());
        assert!(json["rating"].is_null());
        assert_eq!(json["genre"], serde_json::json!([]));
    }

    #[test]
    fn genres_are_nested_objects() {
        let genre = vec![SlugRef {
            name: "Adventure".into(),
            slug: "adventure".into(),
        }];
        let json = serde_json::to_value(row(None, Some(4.0)).into_response(genre)).unwrap();
        assert_eq!(json["genre"][0]["slug"], "adventure");
        assert_eq!(json["rating"], 4.0);
    }
}
