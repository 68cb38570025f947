//! Handlers for the `/genres` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::catalog::{validate_name, validate_slug};
use yamdb_core::error::CoreError;
use yamdb_db::models::genre::{Genre, CreateGenre};
use yamdb_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/genres
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PageResponse<Genre>>> {
    let (limit, offset) = params.bounds();
    let data = GenreRepo::list(&state.pool, params.term(), limit, offset).await?;
    let count = GenreRepo::count(&state.pool, params.term()).await?;
    Ok(Json(PageResponse { data, count }))
}

/// POST /api/v1/genres
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(slug = %genre.slug, "Genre created");
    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    if GenreRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(slug = %slug, "Genre deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::SlugNotFound {
            entity: "Genre",
            slug,
        }))
    }
}
