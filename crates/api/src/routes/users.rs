//! Route definitions for the `/users` resource.
//!
//! `/me` is a static segment, so it takes precedence over `/{username}`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /me                                -> get_me
/// PATCH  /me                                -> update_me
/// GET    /{username}                        -> get_by_username
/// PATCH  /{username}                        -> update_by_username
/// DELETE /{username}                        -> delete_by_username
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route(
            "/{username}",
            get(users::get_by_username)
                .patch(users::update_by_username)
                .delete(users::delete_by_username),
        )
}
