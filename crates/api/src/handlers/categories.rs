//! Handlers for the `/categories` resource.
//!
//! Categories are addressed by slug and expose only `{name, slug}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::catalog::{validate_name, validate_slug};
use yamdb_core::error::CoreError;
use yamdb_db::models::category::{Category, CreateCategory};
use yamdb_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PageResponse<Category>>> {
    let (limit, offset) = params.bounds();
    let data = CategoryRepo::list(&state.pool, params.term(), limit, offset).await?;
    let count = CategoryRepo::count(&state.pool, params.term()).await?;
    Ok(Json(PageResponse { data, count }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(slug = %slug, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::SlugNotFound {
            entity: "Category",
            slug,
        }))
    }
}
