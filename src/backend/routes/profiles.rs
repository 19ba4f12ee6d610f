/**
 * Profile Routes
 *
 * - `GET /api/profiles/{username}` - Profile, `following` relative to the caller
 * - `POST /api/profiles/{username}/follow` - Follow (requires authentication)
 * - `DELETE /api/profiles/{username}/follow` - Unfollow (requires authentication)
 */

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::routes::types::ProfileBody;
use crate::backend::server::state::AppState;
use crate::backend::users::UserService;

pub fn configure_profile_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/profiles/{username}", get(get_profile))
        .route(
            "/api/profiles/{username}/follow",
            post(follow).delete(unfollow),
        )
}

pub async fn get_profile(
    State(users): State<UserService>,
    viewer: MaybeAuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, BackendError> {
    let profile = users.get_profile(viewer.username(), &username).await?;
    Ok(Json(ProfileBody { profile }))
}

/// Follow handler
///
/// # Errors
///
/// * `400 Bad Request` - Following yourself
/// * `404 Not Found` - No such user
/// * `409 Conflict` - Already following
pub async fn follow(
    State(users): State<UserService>,
    caller: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, BackendError> {
    let profile = users.follow_user(&caller.username, &username).await?;
    Ok(Json(ProfileBody { profile }))
}

pub async fn unfollow(
    State(users): State<UserService>,
    caller: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, BackendError> {
    let profile = users.unfollow_user(&caller.username, &username).await?;
    Ok(Json(ProfileBody { profile }))
}
