/**
 * Database Records
 *
 * Row types returned by the repositories, and the inputs they accept.
 * Derived values (tag lists, favorite counts, following flags) are not part
 * of any record; the service layer assembles them into read models.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    /// Unique
    pub email: String,
    /// Unique; articles, comments, favorites and followings reference it
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Article row
///
/// Also the value stored in the article cache, hence the serde derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_username: String,
}

/// Comment row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub body: String,
    pub author_username: String,
    pub article_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub author_username: String,
    pub article_id: Uuid,
}

/// Article listing predicates; all present predicates are AND-ed
///
/// Results are ordered by creation time, newest first.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// Articles carrying this tag
    pub tag: Option<String>,
    /// Articles written by this username
    pub author: Option<String>,
    /// Articles favorited by this username
    pub favorited_by: Option<String>,
    /// Articles written by anyone this username follows
    pub followed_by: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
