//! Category and genre rules.
//!
//! Both are identified publicly by their slug, never by numeric id.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length for a category or genre name.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for a slug.
pub const MAX_SLUG_LENGTH: usize = 50;

const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

/// Validate a slug: 1..=50 chars of ASCII letters, digits, `-` or `_`.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be between 1 and {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use letters, numbers, underscores or hyphens"
        )));
    }
    Ok(())
}

/// Validate a category or genre display name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Report the first slug in `requested` that is absent from `found`.
///
/// Used after resolving a batch of slugs so the caller learns exactly which
/// one was wrong.
pub fn ensure_all_slugs_found(
    entity: &'static str,
    requested: &[String],
    found: &[String],
) -> Result<(), CoreError> {
    match requested.iter().find(|slug| !found.contains(slug)) {
        Some(missing) => Err(CoreError::Validation(format!(
            "{entity} with slug '{missing}' does not exist"
        ))),
        None => Ok(()),
    }
}
