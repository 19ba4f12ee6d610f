/**
 * Comment Routes
 *
 * - `GET /api/articles/{slug}/comments` - Comments, newest first
 * - `POST /api/articles/{slug}/comments` - Add a comment (requires authentication)
 * - `DELETE /api/articles/{slug}/comments/{id}` - Delete, comment author only
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::backend::articles::ArticleService;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::routes::extract::JsonBody;
use crate::backend::routes::types::{
    CommentBody, CommentEnvelope, CommentsBody, CreateCommentRequest,
};
use crate::backend::server::state::AppState;
use crate::shared::validation::require_text;

pub fn configure_comment_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/articles/{slug}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/api/articles/{slug}/comments/{id}", delete(delete_comment))
}

pub async fn list_comments(
    State(articles): State<ArticleService>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<CommentsBody>, BackendError> {
    let comments = articles.get_comments(&slug, viewer.username()).await?;
    Ok(Json(CommentsBody { comments }))
}

pub async fn create_comment(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path(slug): Path<String>,
    JsonBody(CommentEnvelope { comment }): JsonBody<CommentEnvelope<CreateCommentRequest>>,
) -> Result<(StatusCode, Json<CommentBody>), BackendError> {
    require_text("body", &comment.body)?;

    let comment = articles
        .create_comment(&caller.username, &slug, comment.body)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentBody { comment })))
}

/// Delete handler
///
/// An id that is not a UUID, or that belongs to another article, is a 404.
pub async fn delete_comment(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, BackendError> {
    let id = Uuid::parse_str(&id).map_err(|_| BackendError::not_found("comment"))?;
    articles.delete_comment(&slug, id, &caller.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
