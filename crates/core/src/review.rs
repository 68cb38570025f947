//! Review and comment rules.
//!
//! The one-review-per-(author, title) rule is enforced twice: here as a
//! fast pre-check producing a readable error, and by the
//! `uq_reviews_author_title` unique constraint, which is the source of truth.

use crate::error::CoreError;

/// Lowest accepted review score.
pub const MIN_SCORE: i32 = 1;

/// Highest accepted review score.
pub const MAX_SCORE: i32 = 10;

/// Name of the storage constraint backing the duplicate-review rule.
pub const UQ_REVIEW_AUTHOR_TITLE: &str = "uq_reviews_author_title";

/// How a review payload is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    PartialUpdate,
}

impl WriteMode {
    /// Whether this kind of write is subject to the duplicate-review rule.
    pub fn checks_duplicates(self) -> bool {
        matches!(self, WriteMode::Create)
    }
}

/// Reject a create when the author already reviewed the title.
///
/// Partial updates never trigger the check: an author may always edit the
/// review they already have.
pub fn ensure_no_duplicate_review(mode: WriteMode, already_reviewed: bool) -> Result<(), CoreError> {
    if mode.checks_duplicates() && already_reviewed {
        return Err(CoreError::DuplicateReview);
    }
    Ok(())
}

/// Validate that a score lies in `MIN_SCORE..=MAX_SCORE`.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate review or comment text: must contain something besides whitespace.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Text must not be empty".into()));
    }
    Ok(())
}
