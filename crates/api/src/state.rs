use std::sync::Arc;

use yamdb_core::clock::Clock;

use crate::config::ServerConfig;
use crate::mail::ConfirmationMailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of the current year for title validation.
    pub clock: Arc<dyn Clock>,
    /// Delivers sign-up confirmation codes.
    pub mailer: Arc<dyn ConfirmationMailer>,
}
