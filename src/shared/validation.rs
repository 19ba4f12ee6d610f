/**
 * Request Validation
 *
 * Checks that run in the HTTP layer before a request is handed to a service.
 * Every failure is an `InputError`, which the backend renders as
 * 422 Unprocessable Entity. Values are never clamped: an out-of-range limit or
 * offset is rejected.
 *
 * # Rules
 *
 * - `limit` defaults to 20 and must be within [1, 25]
 * - `offset` defaults to 0 and must be >= 0
 * - usernames are 1-64 characters without whitespace
 * - emails must contain '@'
 * - passwords are at least 8 characters
 * - article titles, descriptions, bodies and comment bodies must not be blank
 * - tags must not be blank and must not repeat within one article
 */

use std::collections::HashSet;

use crate::shared::error::InputError;
use crate::shared::models::Pagination;

const MAX_USERNAME_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 8;

/// Validate optional limit/offset query parameters
pub fn validate_pagination(
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Pagination, InputError> {
    let limit = limit.unwrap_or(Pagination::DEFAULT_LIMIT);
    if !(1..=Pagination::MAX_LIMIT).contains(&limit) {
        return Err(InputError::invalid(
            "limit",
            format!("must be between 1 and {}", Pagination::MAX_LIMIT),
        ));
    }

    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(InputError::invalid("offset", "must not be negative"));
    }

    Ok(Pagination { limit, offset })
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), InputError> {
    if username.trim().is_empty() {
        return Err(InputError::invalid("username", "can't be blank"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(InputError::invalid(
            "username",
            format!("must be at most {} characters", MAX_USERNAME_LEN),
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(InputError::invalid("username", "must not contain whitespace"));
    }
    Ok(())
}

/// Validate an email address (basic check)
pub fn validate_email(email: &str) -> Result<(), InputError> {
    if email.trim().is_empty() {
        return Err(InputError::invalid("email", "can't be blank"));
    }
    if !email.contains('@') {
        return Err(InputError::invalid("email", "is invalid"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), InputError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(InputError::invalid(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Reject blank required text fields
pub fn require_text(field: &str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::invalid(field, "can't be blank"));
    }
    Ok(())
}

/// Tags must be non-blank and unique within one article
pub fn validate_tag_list(tags: &[String]) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(InputError::invalid("tagList", "must not contain blank tags"));
        }
        if !seen.insert(tag.as_str()) {
            return Err(InputError::invalid(
                "tagList",
                format!("contains duplicate tag '{}'", tag),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pagination_defaults() {
        let page = validate_pagination(None, None).unwrap();
        assert_eq!(page, Pagination { limit: 20, offset: 0 });
    }

    #[test]
    fn test_pagination_accepts_bounds() {
        assert!(validate_pagination(Some(1), Some(0)).is_ok());
        assert!(validate_pagination(Some(25), Some(1000)).is_ok());
    }

    #[test]
    fn test_pagination_rejects_out_of_range_limit() {
        assert_matches!(
            validate_pagination(Some(-29), None),
            Err(InputError::Invalid { ref field, .. }) if field == "limit"
        );
        assert_matches!(
            validate_pagination(Some(29), None),
            Err(InputError::Invalid { ref field, .. }) if field == "limit"
        );
        assert!(validate_pagination(Some(0), None).is_err());
    }

    #[test]
    fn test_pagination_rejects_negative_offset() {
        assert_matches!(
            validate_pagination(None, Some(-29)),
            Err(InputError::Invalid { ref field, .. }) if field == "offset"
        );
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("jake").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_email_and_password_rules() {
        assert!(validate_email("jake@jake.jake").is_ok());
        assert!(validate_email("jake").is_err());
        assert!(validate_password("jakejake").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_tag_list_rules() {
        assert!(validate_tag_list(&[]).is_ok());
        assert!(validate_tag_list(&["a".to_string(), "b".to_string()]).is_ok());
        assert!(validate_tag_list(&["a".to_string(), "a".to_string()]).is_err());
        assert!(validate_tag_list(&[" ".to_string()]).is_err());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("title", "How to train your dragon").is_ok());
        assert_eq!(
            require_text("title", "   ").unwrap_err().to_string(),
            "title can't be blank"
        );
    }
}
