/**
 * Repository Errors
 *
 * Driver errors are classified exactly once, here, into a structured
 * `RepoError`. Unique-constraint violations carry a `Constraint` parsed from
 * the constraint name Postgres reports, so the service layer matches on an
 * enum instead of inspecting driver messages.
 *
 * Constraint names must stay in sync with `migrations/`.
 */

use thiserror::Error;

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const ARTICLES_SLUG_KEY: &str = "articles_slug_key";
pub const ARTICLE_TAGS_PKEY: &str = "article_tags_pkey";
pub const ARTICLE_FAVORITES_PKEY: &str = "article_favorites_pkey";
pub const FOLLOWINGS_PKEY: &str = "followings_pkey";

/// Unique constraints known to the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    UserEmail,
    UserUsername,
    ArticleSlug,
    ArticleTag,
    ArticleFavorite,
    Following,
    /// A constraint this crate does not know about
    Other(String),
}

impl Constraint {
    pub fn from_name(name: &str) -> Self {
        match name {
            USERS_EMAIL_KEY => Self::UserEmail,
            USERS_USERNAME_KEY => Self::UserUsername,
            ARTICLES_SLUG_KEY => Self::ArticleSlug,
            ARTICLE_TAGS_PKEY => Self::ArticleTag,
            ARTICLE_FAVORITES_PKEY => Self::ArticleFavorite,
            FOLLOWINGS_PKEY => Self::Following,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::UserEmail => USERS_EMAIL_KEY,
            Self::UserUsername => USERS_USERNAME_KEY,
            Self::ArticleSlug => ARTICLES_SLUG_KEY,
            Self::ArticleTag => ARTICLE_TAGS_PKEY,
            Self::ArticleFavorite => ARTICLE_FAVORITES_PKEY,
            Self::Following => FOLLOWINGS_PKEY,
            Self::Other(name) => name,
        }
    }
}

/// Persistence-layer error
#[derive(Debug, Error)]
pub enum RepoError {
    /// The statement matched no row
    #[error("row not found")]
    NotFound,

    /// An insert or update collided with a unique constraint
    #[error("unique constraint `{}` violated", .0.name())]
    UniqueViolation(Constraint),

    /// A row referenced a user or article that does not exist
    #[error("foreign key `{0}` violated")]
    MissingReference(String),

    /// Any other driver failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(Constraint::from_name(db_err.constraint().unwrap_or_default()))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::MissingReference(db_err.constraint().unwrap_or_default().to_string())
            }
            other => Self::Database(other),
        }
    }
}
