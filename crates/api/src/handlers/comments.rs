//! Handlers for comments nested under
//! `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::review::validate_text;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::Comment;
use yamdb_db::repositories::CommentRepo;

use super::reviews::find_review;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// Comment creation body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Partial comment update body.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<Comment>>> {
    find_review(&state, title_id, review_id).await?;
    let (limit, offset) = params.bounds();
    let data = CommentRepo::list_for_review(&state.pool, review_id, limit, offset).await?;
    let count = CommentRepo::count_for_review(&state.pool, review_id).await?;
    Ok(Json(PageResponse { data, count }))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    find_review(&state, title_id, review_id).await?;
    Ok(Json(find_comment(&state, review_id, comment_id).await?))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    find_review(&state, title_id, review_id).await?;
    validate_text(&input.text)?;

    let comment = CommentRepo::create(&state.pool, review_id, user.user_id, &input.text).await?;
    tracing::info!(review_id, comment_id = comment.id, user_id = user.user_id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    find_review(&state, title_id, review_id).await?;
    let existing = find_comment(&state, review_id, comment_id).await?;
    user.ensure_can_modify(existing.author_id)?;

    let Some(text) = input.text else {
        return Ok(Json(existing));
    };
    validate_text(&text)?;

    let comment = CommentRepo::update_text(&state.pool, review_id, comment_id, &text)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;
    Ok(Json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_review(&state, title_id, review_id).await?;
    let existing = find_comment(&state, review_id, comment_id).await?;
    user.ensure_can_modify(existing.author_id)?;

    CommentRepo::delete(&state.pool, review_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(state: &AppState, review_id: DbId, comment_id: DbId) -> AppResult<Comment> {
    CommentRepo::find(&state.pool, review_id, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))
}
