/**
 * Article Routes
 *
 * - `GET /api/articles` - List (tag, author, favorited, limit, offset)
 * - `GET /api/articles/feed` - Articles by followed authors (requires authentication)
 * - `POST /api/articles` - Create (requires authentication)
 * - `GET /api/articles/{slug}` - Single article
 * - `PUT /api/articles/{slug}` - Partial update, author only
 * - `DELETE /api/articles/{slug}` - Delete, author only
 * - `POST /api/articles/{slug}/favorite` - Favorite (requires authentication)
 * - `DELETE /api/articles/{slug}/favorite` - Unfavorite (requires authentication)
 *
 * `limit` and `offset` are validated here; out-of-range values are a 422.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::backend::articles::{ArticleFilter, ArticleService, ArticleUpdate, NewArticleInput};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::routes::extract::{JsonBody, QueryParams};
use crate::backend::routes::types::{
    ArticleBody, ArticleEnvelope, CreateArticleRequest, FeedQuery, ListArticlesQuery,
    UpdateArticleRequest,
};
use crate::backend::server::state::AppState;
use crate::shared::validation::{require_text, validate_pagination, validate_tag_list};
use crate::shared::ArticleList;

pub fn configure_article_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/articles", get(list_articles).post(create_article))
        .route("/api/articles/feed", get(feed))
        .route(
            "/api/articles/{slug}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route(
            "/api/articles/{slug}/favorite",
            post(favorite).delete(unfavorite),
        )
}

pub async fn list_articles(
    State(articles): State<ArticleService>,
    viewer: MaybeAuthUser,
    QueryParams(query): QueryParams<ListArticlesQuery>,
) -> Result<Json<ArticleList>, BackendError> {
    let filter = ArticleFilter {
        pagination: validate_pagination(query.limit, query.offset)?,
        tag: query.tag,
        author: query.author,
        favorited: query.favorited,
    };
    let list = articles.get_articles(&filter, viewer.username()).await?;
    Ok(Json(list))
}

pub async fn feed(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    QueryParams(query): QueryParams<FeedQuery>,
) -> Result<Json<ArticleList>, BackendError> {
    let pagination = validate_pagination(query.limit, query.offset)?;
    let list = articles
        .get_articles_feed(&caller.username, pagination)
        .await?;
    Ok(Json(list))
}

/// Create handler
///
/// # Errors
///
/// * `422 Unprocessable Entity` - Blank title/description/body, blank or
///   repeated tags
pub async fn create_article(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    JsonBody(ArticleEnvelope { article }): JsonBody<ArticleEnvelope<CreateArticleRequest>>,
) -> Result<(StatusCode, Json<ArticleBody>), BackendError> {
    require_text("title", &article.title)?;
    require_text("description", &article.description)?;
    require_text("body", &article.body)?;
    validate_tag_list(&article.tag_list)?;

    let article = articles
        .create_article(
            &caller.username,
            NewArticleInput {
                title: article.title,
                description: article.description,
                body: article.body,
                tag_list: article.tag_list,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ArticleBody { article })))
}

pub async fn get_article(
    State(articles): State<ArticleService>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, BackendError> {
    let article = articles
        .get_article_by_slug(viewer.username(), &slug)
        .await?;
    Ok(Json(ArticleBody { article }))
}

pub async fn update_article(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path(slug): Path<String>,
    JsonBody(ArticleEnvelope { article }): JsonBody<ArticleEnvelope<UpdateArticleRequest>>,
) -> Result<Json<ArticleBody>, BackendError> {
    for (field, value) in [
        ("title", &article.title),
        ("description", &article.description),
        ("body", &article.body),
    ] {
        if let Some(value) = value {
            require_text(field, value)?;
        }
    }

    let article = articles
        .update_article_by_slug(
            &caller.username,
            &slug,
            ArticleUpdate {
                title: article.title,
                description: article.description,
                body: article.body,
            },
        )
        .await?;

    Ok(Json(ArticleBody { article }))
}

pub async fn delete_article(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, BackendError> {
    articles.delete_article(&slug, &caller.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, BackendError> {
    let article = articles
        .favorite_article_by_slug(&caller.username, &slug)
        .await?;
    Ok(Json(ArticleBody { article }))
}

pub async fn unfavorite(
    State(articles): State<ArticleService>,
    caller: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, BackendError> {
    let article = articles
        .unfavorite_article_by_slug(&caller.username, &slug)
        .await?;
    Ok(Json(ArticleBody { article }))
}
