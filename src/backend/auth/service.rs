/**
 * Auth Service
 *
 * Login, registration and current-user, each answering with the user plus a
 * freshly issued token.
 *
 * # Security
 *
 * - An unknown identity and a wrong password both yield
 *   `InvalidCredentials` (no user enumeration)
 * - Passwords are verified with bcrypt on the blocking pool
 * - Passwords are never logged or returned
 */

use crate::backend::auth::passwords::verify_password;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::db::models::UserRecord;
use crate::backend::error::BackendError;
use crate::backend::users::{NewUserInput, UserLookup, UserService, UserUpdate};
use crate::shared::UserResponse;

/// The account field a login names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Email(String),
    Username(String),
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email(email) => write!(f, "email {}", email),
            Self::Username(username) => write!(f, "username {}", username),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub identity: Identity,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: UserService, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub async fn login(&self, input: LoginInput) -> Result<UserResponse, BackendError> {
        let lookup = match &input.identity {
            Identity::Email(email) => UserLookup {
                email: Some(email.clone()),
                username: None,
            },
            Identity::Username(username) => UserLookup {
                email: None,
                username: Some(username.clone()),
            },
        };

        let user = match self.users.get_one(&lookup).await {
            Ok(user) => user,
            Err(BackendError::NotFound { .. }) => {
                tracing::warn!("Login for unknown user: {}", input.identity);
                return Err(BackendError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !verify_password(input.password, user.password_hash.clone()).await? {
            tracing::warn!("Invalid password for user: {}", user.username);
            return Err(BackendError::InvalidCredentials);
        }

        tracing::info!("User logged in: {}", user.username);
        self.respond(&user)
    }

    pub async fn register(&self, input: NewUserInput) -> Result<UserResponse, BackendError> {
        let user = self.users.insert(input).await?;
        self.respond(&user)
    }

    /// The token holder's account; a token for a vanished user is rejected
    pub async fn current_user(&self, username: &str) -> Result<UserResponse, BackendError> {
        let user = self.lookup_token_user(username).await?;
        self.respond(&user)
    }

    /// Update the token holder's account; the new token carries the new username
    pub async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<UserResponse, BackendError> {
        self.lookup_token_user(username).await?;
        let user = self.users.update(username, update).await?;
        self.respond(&user)
    }

    /// Verify a token and return its subject
    ///
    /// The subject must still name an account: a token issued before a
    /// rename is rejected.
    pub async fn authenticate(&self, token: &str) -> Result<String, BackendError> {
        let claims = self.tokens.verify_token(token).map_err(|e| {
            tracing::warn!("Invalid token: {}", e);
            BackendError::unauthorized("invalid or expired token")
        })?;
        let user = self.lookup_token_user(&claims.sub).await?;
        Ok(user.username)
    }

    async fn lookup_token_user(&self, username: &str) -> Result<UserRecord, BackendError> {
        match self.users.get_by_username(username).await {
            Err(BackendError::NotFound { .. }) => {
                tracing::warn!("Token subject no longer exists: {}", username);
                Err(BackendError::unauthorized("user no longer exists"))
            }
            other => other,
        }
    }

    fn respond(&self, user: &UserRecord) -> Result<UserResponse, BackendError> {
        let token = self
            .tokens
            .create_token(&user.username)
            .map_err(|e| BackendError::internal("failed to create token", e))?;

        Ok(UserResponse {
            email: user.email.clone(),
            token,
            username: user.username.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
        })
    }
}
