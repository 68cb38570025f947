//! Handlers for reviews nested under `/titles/{title_id}/reviews`.
//!
//! A user may review a title once. The pre-check below gives a readable
//! error; the `uq_reviews_author_title` constraint catches the race the
//! pre-check cannot, and its violation is reported the same way.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::review::{
    ensure_no_duplicate_review, validate_score, validate_text, WriteMode, UQ_REVIEW_AUTHOR_TITLE,
};
use yamdb_core::types::DbId;
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// Review creation body. `author` and `title` are never read from input.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i32,
}

/// Partial review update body.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<Review>>> {
    ensure_title_exists(&state, title_id).await?;
    let (limit, offset) = params.bounds();
    let data = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    Ok(Json(PageResponse { data, count }))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(find_review(&state, title_id, review_id).await?))
}

/// Translate a failed review insert. A `uq_reviews_author_title` violation
/// is the same rejection as the pre-check's.
pub fn map_review_insert_error(err: sqlx::Error) -> AppError {
    if yamdb_db::is_unique_violation(&err, UQ_REVIEW_AUTHOR_TITLE) {
        AppError::Core(CoreError::DuplicateReview)
    } else {
        AppError::Database(err)
    }
}

/// POST /api/v1/titles/{title_id}/reviews
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_title_exists(&state, title_id).await?;
    validate_text(&input.text)?;
    validate_score(input.score)?;
    check_duplicate(&state, WriteMode::Create, title_id, user.user_id).await?;

    let review = ReviewRepo::create(
        &state.pool,
        title_id,
        user.user_id,
        &CreateReview {
            text: input.text,
            score: input.score,
        },
    )
    .await
    .map_err(map_review_insert_error)?;

    tracing::info!(title_id, review_id = review.id, user_id = user.user_id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let existing = find_review(&state, title_id, review_id).await?;
    user.ensure_can_modify(existing.author_id)?;
    if let Some(text) = &input.text {
        validate_text(text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }
    check_duplicate(&state, WriteMode::PartialUpdate, title_id, existing.author_id).await?;

    let update = UpdateReview {
        text: input.text,
        score: input.score,
    };
    let review = ReviewRepo::update(&state.pool, title_id, review_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;
    Ok(Json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let existing = find_review(&state, title_id, review_id).await?;
    user.ensure_can_modify(existing.author_id)?;

    ReviewRepo::delete(&state.pool, title_id, review_id).await?;
    tracing::info!(title_id, review_id, user_id = user.user_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply the one-review-per-title rule for this kind of write.
///
/// Only creates hit the database; partial updates pass straight through.
async fn check_duplicate(
    state: &AppState,
    mode: WriteMode,
    title_id: DbId,
    author_id: DbId,
) -> AppResult<()> {
    let already_reviewed = mode.checks_duplicates()
        && ReviewRepo::exists_for_author(&state.pool, title_id, author_id).await?;
    ensure_no_duplicate_review(mode, already_reviewed)?;
    Ok(())
}

async fn ensure_title_exists(state: &AppState, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(&state.pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }))
    }
}

/// Load a review that must belong to `title_id`.
pub(crate) async fn find_review(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ReviewRepo::find(&state.pool, title_id, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))
}
