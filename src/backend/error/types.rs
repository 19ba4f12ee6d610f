/**
 * Backend Error Types
 *
 * The domain error taxonomy returned by every service method. Each variant
 * has a stable, client-safe message and maps to an `ErrorKind`, which in turn
 * maps to an HTTP status.
 *
 * # Error Categories
 *
 * - `NotFound` - missing user, article or comment
 * - `Forbidden` - the caller is not the author of the resource
 * - `Conflict` - duplicate email/username, already following
 * - `BadRequest` - self-follow
 * - `Unauthorized` - bad credentials or token
 * - `Unprocessable` - input validation failures
 * - `Internal` - anything unexpected; the cause is logged, never returned
 *
 * Repository errors never pass through unexamined: call sites either match
 * the specific `RepoError` they expect or go through `BackendError::internal`,
 * which logs the cause and returns an opaque `Internal`.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::db::RepoError;
use crate::shared::InputError;

/// Severity tag the HTTP layer renders from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unprocessable,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Client input failed validation
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{entity} not found")]
    NotFound {
        /// What was looked up ("user", "article", "comment", "profile")
        entity: &'static str,
    },

    /// The caller may not act on this resource
    #[error("{message}")]
    Forbidden { message: String },

    /// Missing, malformed or expired token
    #[error("{message}")]
    Unauthorized { message: String },

    /// Login failed; unknown identity and wrong password look the same
    #[error("email or password is invalid")]
    InvalidCredentials,

    #[error("cannot follow or unfollow yourself")]
    SelfFollow,

    #[error("already following {username}")]
    AlreadyFollowing { username: String },

    #[error("email has already been taken")]
    DuplicateEmail,

    #[error("username has already been taken")]
    DuplicateUsername,

    /// Unexpected failure; details were logged where it was created
    #[error("internal server error")]
    Internal,
}

impl BackendError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Log `err` with `context` and return an opaque internal error
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "{}", context);
        Self::Internal
    }

    /// `NotFound` for a missing row, `Internal` for anything else
    pub fn from_repo(entity: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(entity),
            other => Self::internal(&format!("{} lookup failed", entity), other),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Unprocessable,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Unauthorized { .. } | Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::SelfFollow => ErrorKind::BadRequest,
            Self::AlreadyFollowing { .. } | Self::DuplicateEmail | Self::DuplicateUsername => {
                ErrorKind::Conflict
            }
            Self::Internal => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Client-visible message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::db::Constraint;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::not_found("article").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::forbidden("nope").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::SelfFollow.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BackendError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(BackendError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let input: BackendError = InputError::invalid("title", "can't be blank").into();
        assert_eq!(input.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_duplicate_errors_are_distinguishable() {
        assert_ne!(
            BackendError::DuplicateEmail.message(),
            BackendError::DuplicateUsername.message()
        );
    }

    #[test]
    fn test_from_repo() {
        assert!(matches!(
            BackendError::from_repo("user", RepoError::NotFound),
            BackendError::NotFound { entity: "user" }
        ));
        assert!(matches!(
            BackendError::from_repo("user", RepoError::UniqueViolation(Constraint::UserEmail)),
            BackendError::Internal
        ));
    }

    #[test]
    fn test_internal_message_hides_cause() {
        let error = BackendError::internal("query failed", "relation \"users\" does not exist");
        assert_eq!(error.message(), "internal server error");
    }
}
