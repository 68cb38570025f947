//! Handlers for the `/users` resource.
//!
//! Admins manage every account by username; any authenticated user can read
//! and edit their own profile at `/users/me`, where `role` is read-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::account::{generate_confirmation_code, validate_signup_username};
use yamdb_core::error::CoreError;
use yamdb_core::roles::{validate_role, ROLE_USER};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Admin request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub username: String,
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub role: Option<String>,
}

/// Admin request body for a partial user update.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// Self-service profile update. There is no `role` field, so a `role`
/// key in the body is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PageResponse<UserResponse>>> {
    let (limit, offset) = params.bounds();
    let search = params.term();
    let users = UserRepo::list(&state.pool, search, limit, offset).await?;
    let count = UserRepo::count(&state.pool, search).await?;
    Ok(Json(PageResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        count,
    }))
}

/// POST /api/v1/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_signup_username(&input.username)?;
    input.validate()?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_role(&role)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role,
            confirmation_code: generate_confirmation_code(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created by admin");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_by_username(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_by_username(&state, &username).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{username}
pub async fn update_by_username(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(input): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    if let Some(new_username) = &input.username {
        validate_signup_username(new_username)?;
    }
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    let user = find_by_username(&state, &username).await?;
    let update = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: input.role,
    };
    let user = UserRepo::update(&state.pool, user.id, &update)
        .await?
        .ok_or(CoreError::UserNotFound(username))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_by_username(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    if UserRepo::delete_by_username(&state.pool, &username).await? {
        tracing::info!(username = %username, deleted_by = admin.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::UserNotFound(username)))
    }
}

// ---------------------------------------------------------------------------
// Self-service handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let me = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    Ok(Json(me.into()))
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    if let Some(new_username) = &input.username {
        validate_signup_username(new_username)?;
    }

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: None,
    };
    let me = UserRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    Ok(Json(me.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_by_username(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::UserNotFound(username.to_string())))
}
