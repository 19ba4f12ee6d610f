/**
 * Request and Response Bodies
 *
 * Conduit wraps every payload in a single-key envelope: `{"user": …}`,
 * `{"article": …}`, `{"comment": …}`, `{"profile": …}`, `{"tags": […]}`.
 */

use serde::{Deserialize, Serialize};

use crate::shared::{Article, Comment, Patch, Profile, UserResponse};

#[derive(Debug, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Debug, Deserialize)]
pub struct ArticleEnvelope<T> {
    pub article: T,
}

#[derive(Debug, Deserialize)]
pub struct CommentEnvelope<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Either `email` or `username` identifies the account
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `null` clears the bio
    #[serde(default)]
    pub bio: Patch<String>,
    /// `null` clears the image
    #[serde(default)]
    pub image: Patch<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// `GET /api/articles` query string
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/articles/feed` query string
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ArticleBody {
    pub article: Article,
}

#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentsBody {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct TagsBody {
    pub tags: Vec<String>,
}
