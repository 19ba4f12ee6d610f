/**
 * User Routes
 *
 * - `POST /api/users` - Register
 * - `POST /api/users/login` - Login
 * - `GET /api/user` - Current user (requires authentication)
 * - `PUT /api/user` - Update current user (requires authentication)
 *
 * Every response is `{"user": {email, token, username, bio, image}}` with a
 * freshly issued token.
 */

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::backend::auth::{AuthService, Identity, LoginInput};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::routes::extract::JsonBody;
use crate::backend::routes::types::{
    LoginRequest, RegisterRequest, UpdateUserRequest, UserBody, UserEnvelope,
};
use crate::backend::server::state::AppState;
use crate::backend::users::{NewUserInput, UserUpdate};
use crate::shared::validation::{
    require_text, validate_email, validate_password, validate_username,
};
use crate::shared::InputError;

pub fn configure_user_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/users", post(register))
        .route("/api/users/login", post(login))
        .route("/api/user", get(current_user).put(update_user))
}

/// Register handler
///
/// # Errors
///
/// * `422 Unprocessable Entity` - Invalid username, email or password
/// * `409 Conflict` - Email or username already taken
pub async fn register(
    State(auth): State<AuthService>,
    JsonBody(UserEnvelope { user }): JsonBody<UserEnvelope<RegisterRequest>>,
) -> Result<(StatusCode, Json<UserBody>), BackendError> {
    validate_username(&user.username)?;
    validate_email(&user.email)?;
    validate_password(&user.password)?;

    tracing::info!("Registration request for: {}", user.username);
    let user = auth
        .register(NewUserInput {
            email: user.email,
            username: user.username,
            password: user.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserBody { user })))
}

/// Login handler
///
/// Unknown accounts and wrong passwords both answer `401` with the same
/// message.
pub async fn login(
    State(auth): State<AuthService>,
    JsonBody(UserEnvelope { user }): JsonBody<UserEnvelope<LoginRequest>>,
) -> Result<Json<UserBody>, BackendError> {
    let identity = match (user.email, user.username) {
        (Some(email), _) => {
            require_text("email", &email)?;
            Identity::Email(email)
        }
        (None, Some(username)) => {
            require_text("username", &username)?;
            Identity::Username(username)
        }
        (None, None) => return Err(InputError::invalid("email", "can't be blank").into()),
    };
    require_text("password", &user.password)?;

    let user = auth
        .login(LoginInput {
            identity,
            password: user.password,
        })
        .await?;

    Ok(Json(UserBody { user }))
}

pub async fn current_user(
    State(auth): State<AuthService>,
    caller: AuthUser,
) -> Result<Json<UserBody>, BackendError> {
    let user = auth.current_user(&caller.username).await?;
    Ok(Json(UserBody { user }))
}

/// Update handler
///
/// Only the fields present in the body change. `bio` and `image` may be
/// sent as `null` to clear them.
pub async fn update_user(
    State(auth): State<AuthService>,
    caller: AuthUser,
    JsonBody(UserEnvelope { user }): JsonBody<UserEnvelope<UpdateUserRequest>>,
) -> Result<Json<UserBody>, BackendError> {
    if let Some(username) = &user.username {
        validate_username(username)?;
    }
    if let Some(email) = &user.email {
        validate_email(email)?;
    }
    if let Some(password) = &user.password {
        validate_password(password)?;
    }

    let user = auth
        .update_user(
            &caller.username,
            UserUpdate {
                email: user.email,
                username: user.username,
                password: user.password,
                bio: user.bio,
                image: user.image,
            },
        )
        .await?;

    Ok(Json(UserBody { user }))
}
