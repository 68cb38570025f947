//! Well-known role name constants and permission helpers.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Whether a role may edit or delete content authored by other users.
pub fn can_moderate(role: &str) -> bool {
    role == ROLE_MODERATOR || role == ROLE_ADMIN
}

/// Whether `user_id` with `role` may modify a record authored by `author_id`.
pub fn can_modify(user_id: DbId, role: &str, author_id: DbId) -> bool {
    user_id == author_id || can_moderate(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_roles_are_valid() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(validate_role("superuser").is_err());
        assert!(validate_role("").is_err());
        assert!(validate_role("Admin").is_err());
    }

    #[test]
    fn moderators_and_admins_can_moderate() {
        assert!(can_moderate(ROLE_ADMIN));
        assert!(can_moderate(ROLE_MODERATOR));
        assert!(!can_moderate(ROLE_USER));
    }

    #[test]
    fn author_can_modify_own_record() {
        assert!(can_modify(7, ROLE_USER, 7));
        assert!(!can_modify(7, ROLE_USER, 8));
        assert!(can_modify(7, ROLE_MODERATOR, 8));
    }
}
