/**
 * Tag Routes
 *
 * - `GET /api/tags` - Every tag in use, ascending
 */

use axum::{extract::State, routing::get, Json, Router};

use crate::backend::articles::ArticleService;
use crate::backend::error::BackendError;
use crate::backend::routes::types::TagsBody;
use crate::backend::server::state::AppState;

pub fn configure_tag_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/tags", get(list_tags))
}

pub async fn list_tags(
    State(articles): State<ArticleService>,
) -> Result<Json<TagsBody>, BackendError> {
    let tags = articles.get_all_tags().await?;
    Ok(Json(TagsBody { tags }))
}
