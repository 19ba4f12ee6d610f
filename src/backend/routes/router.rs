/**
 * Router Configuration
 *
 * Assembles every route group into one axum router, adds the health check,
 * a JSON 404 fallback and request tracing.
 */

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::{
    articles::configure_article_routes, comments::configure_comment_routes,
    profiles::configure_profile_routes, tags::configure_tag_routes,
    users::configure_user_routes,
};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// ## User Routes
/// - `POST /api/users`, `POST /api/users/login`, `GET|PUT /api/user`
///
/// ## Profile Routes
/// - `GET /api/profiles/{username}`, `POST|DELETE /api/profiles/{username}/follow`
///
/// ## Article Routes
/// - `GET|POST /api/articles`, `GET /api/articles/feed`
/// - `GET|PUT|DELETE /api/articles/{slug}`
/// - `POST|DELETE /api/articles/{slug}/favorite`
///
/// ## Comment Routes
/// - `GET|POST /api/articles/{slug}/comments`
/// - `DELETE /api/articles/{slug}/comments/{id}`
///
/// ## Other
/// - `GET /api/tags`, `GET /health`
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = configure_user_routes(router);
    let router = configure_profile_routes(router);
    let router = configure_article_routes(router);
    let router = configure_comment_routes(router);
    let router = configure_tag_routes(router);

    router
        .fallback(|| async { BackendError::not_found("route") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
