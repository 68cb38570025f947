use crate::types::DbId;

/// Domain-level error shared by the repository and API layers.
///
/// The first five variants are the business-rule rejections of the review
/// service; the rest are the generic request failures every resource can
/// produce.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("You can send only one review for one title.")]
    DuplicateReview,

    #[error("You can not use this username: '{0}'.")]
    ReservedUsername(String),

    #[error("Confirmation code is not correct!")]
    InvalidConfirmationCode,

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Enter the year from {min} to {max}, got {year}.")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} with slug '{slug}'")]
    SlugNotFound { entity: &'static str, slug: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
