//! Title field rules.

use crate::error::CoreError;

/// Earliest accepted release year.
pub const MIN_TITLE_YEAR: i32 = 1000;

/// Maximum length for a title name.
pub const MAX_TITLE_NAME_LENGTH: usize = 256;

/// Validate that `year` lies in `MIN_TITLE_YEAR..=current_year`.
///
/// `current_year` is supplied by the caller (normally from a
/// [`Clock`](crate::clock::Clock)) rather than read here, so the outcome is a
/// pure function of its inputs.
pub fn validate_year(year: i32, current_year: i32) -> Result<i32, CoreError> {
    if (MIN_TITLE_YEAR..=current_year).contains(&year) {
        Ok(year)
    } else {
        Err(CoreError::YearOutOfRange {
            year,
            min: MIN_TITLE_YEAR,
            max: current_year,
        })
    }
}

/// Validate a title name: non-blank and at most [`MAX_TITLE_NAME_LENGTH`] characters.
pub fn validate_title_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Title name must not be empty".into()));
    }
    if name.chars().count() > MAX_TITLE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title name exceeds maximum length of {MAX_TITLE_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const NOW: i32 = 2026;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(validate_year(1000, NOW).unwrap(), 1000);
        assert_eq!(validate_year(NOW, NOW).unwrap(), NOW);
    }

    #[test]
    fn year_before_floor_rejected() {
        assert_matches!(
            validate_year(999, NOW),
            Err(CoreError::YearOutOfRange { year: 999, min: 1000, max: NOW })
        );
        assert_matches!(validate_year(899, NOW), Err(CoreError::YearOutOfRange { .. }));
    }

    #[test]
    fn future_year_rejected() {
        assert_matches!(
            validate_year(NOW + 1, NOW),
            Err(CoreError::YearOutOfRange { .. })
        );
    }

    #[test]
    fn upper_bound_follows_injected_year() {
        assert!(validate_year(2030, 2029).is_err());
        assert!(validate_year(2030, 2030).is_ok());
    }

    #[test]
    fn typical_years_accepted() {
        assert!(validate_year(1895, NOW).is_ok());
        assert!(validate_year(2000, NOW).is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_title_name("   ").is_err());
        assert!(validate_title_name("").is_err());
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(MAX_TITLE_NAME_LENGTH + 1);
        assert!(validate_title_name(&name).is_err());
        assert!(validate_title_name(&name[1..]).is_ok());
    }
}
