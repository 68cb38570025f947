//! Handlers for the `/titles` resource.
//!
//! Category and genres are written as slugs and resolved to ids before the
//! write; reads return them as nested `{name, slug}` objects together with
//! the rating computed from the current reviews.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::catalog::ensure_all_slugs_found;
use yamdb_core::error::CoreError;
use yamdb_core::title::{validate_title_name, validate_year};
use yamdb_core::types::DbId;
use yamdb_db::models::title::{
    CreateTitle, SlugRef, TitleListParams, TitleResponse, TitleRow, UpdateTitle,
};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::page_bounds;
use crate::response::PageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Title creation body. `category` and `genre` are slugs.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Partial title update body. A present `genre` list replaces the current set.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TitleListParams>,
) -> AppResult<Json<PageResponse<TitleResponse>>> {
    let (limit, offset) = page_bounds(params.limit, params.offset);
    let rows = TitleRepo::list(&state.pool, &params, limit, offset).await?;
    let count = TitleRepo::count(&state.pool, &params).await?;
    let data = attach_genres(&state, rows).await?;
    Ok(Json(PageResponse { data, count }))
}

/// GET /api/v1/titles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TitleResponse>> {
    let row = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))?;
    Ok(Json(into_single_response(&state, row).await?))
}

/// POST /api/v1/titles
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    validate_title_name(&input.name)?;
    let year = validate_year(input.year, state.clock.current_year())?;
    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state, &input.genre).await?;

    let row = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name: input.name,
            year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = row.id, "Title created");
    Ok((StatusCode::CREATED, Json(into_single_response(&state, row).await?)))
}

/// PATCH /api/v1/titles/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    if let Some(name) = &input.name {
        validate_title_name(name)?;
    }
    let year = input
        .year
        .map(|year| validate_year(year, state.clock.current_year()))
        .transpose()?;
    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let update = UpdateTitle {
        name: input.name,
        year,
        description: input.description,
        category_id,
        genre_ids,
    };
    let row = TitleRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))?;
    Ok(Json(into_single_response(&state, row).await?))
}

/// DELETE /api/v1/titles/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TitleRepo::delete(&state.pool, id).await? {
        tracing::info!(title_id = id, "Title deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn resolve_category(state: &AppState, slug: &str) -> AppResult<DbId> {
    let category = CategoryRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Category with slug '{slug}' does not exist"))
        })?;
    Ok(category.id)
}

async fn resolve_genres(state: &AppState, slugs: &[String]) -> AppResult<Vec<DbId>> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let genres = GenreRepo::find_by_slugs(&state.pool, slugs).await?;
    let found: Vec<String> = genres.iter().map(|g| g.slug.clone()).collect();
    ensure_all_slugs_found("Genre", slugs, &found)?;
    Ok(genres.into_iter().map(|g| g.id).collect())
}

/// Load the genres of every row in one query and shape the rows for output.
async fn attach_genres(state: &AppState, rows: Vec<TitleRow>) -> AppResult<Vec<TitleResponse>> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut by_title: HashMap<DbId, Vec<SlugRef>> = HashMap::new();
    for genre in TitleRepo::genres_for(&state.pool, &ids).await? {
        by_title.entry(genre.title_id).or_default().push(SlugRef {
            name: genre.name,
            slug: genre.slug,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let genre = by_title.remove(&row.id).unwrap_or_default();
            row.into_response(genre)
        })
        .collect())
}

async fn into_single_response(state: &AppState, row: TitleRow) -> AppResult<TitleResponse> {
    let mut responses = attach_genres(state, vec![row]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::InternalError("Title row vanished while shaping response".into()))
}
