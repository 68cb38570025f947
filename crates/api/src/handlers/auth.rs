//! Handlers for the `/auth` resource (sign-up and token exchange).
//!
//! There are no passwords: signing up mails a random confirmation code,
//! and that code is traded for a JWT access token.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::account::{
    generate_confirmation_code, validate_signup_username, verify_confirmation_code,
};
use yamdb_core::error::CoreError;
use yamdb_core::roles::ROLE_USER;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Sign-up request body. Only these two fields are accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub username: String,
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: String,
}

/// Sign-up response: the submitted data echoed back.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Token request body.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "Confirmation code must not be empty"))]
    pub confirmation_code: String,
}

/// Token response body.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Registers `(username, email)` and mails a confirmation code. Submitting
/// the same pair again issues a new code; a username or email that belongs
/// to a different account is rejected.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    validate_signup_username(&input.username)?;
    input.validate()?;

    let code = generate_confirmation_code();

    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let by_email = UserRepo::find_by_email(&state.pool, &input.email).await?;

    match (by_username, by_email) {
        (Some(existing), Some(same)) if existing.id == same.id => {
            UserRepo::set_confirmation_code(&state.pool, existing.id, &code).await?;
            tracing::info!(user_id = existing.id, "Confirmation code regenerated");
        }
        (Some(_), _) => {
            return Err(AppError::Core(CoreError::Validation(
                "A user with this username already exists".into(),
            )));
        }
        (None, Some(_)) => {
            return Err(AppError::Core(CoreError::Validation(
                "A user with this email already exists".into(),
            )));
        }
        (None, None) => {
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: input.username.clone(),
                    email: input.email.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    bio: String::new(),
                    role: ROLE_USER.to_string(),
                    confirmation_code: code.clone(),
                },
            )
            .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
        }
    }

    state
        .mailer
        .send_code(&input.email, &input.username, &code)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send confirmation code: {e}")))?;

    Ok(Json(SignupResponse {
        username: input.username,
        email: input.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchanges `(username, confirmation_code)` for an access token.
pub async fn token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    input.validate()?;

    let user = validate_token_request(&state, &input).await?;

    UserRepo::mark_confirmed(&state.pool, user.id).await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

/// Check a token request and return the user it proves ownership of.
///
/// Unknown usernames are a 404; a wrong code is a 400.
async fn validate_token_request(state: &AppState, input: &TokenRequest) -> AppResult<User> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(input.username.clone()))?;

    verify_confirmation_code(&input.confirmation_code, &user.confirmation_code)?;

    Ok(user)
}
