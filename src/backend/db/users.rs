/**
 * User Repository
 *
 * Parameterized SQL against the `users` table. Every mutating statement runs
 * in its own transaction.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::backend::db::error::RepoError;
use crate::backend::db::models::{NewUser, UserRecord};

const USER_COLUMNS: &str =
    "id, email, username, password_hash, bio, image, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find the user matching the email OR the username
    ///
    /// Returns `RepoError::NotFound` when neither matches (or both are `None`).
    async fn find_one(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<UserRecord, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<UserRecord, RepoError>;

    /// Fetch every user whose username is in `usernames`; unknown names are skipped
    async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<UserRecord>, RepoError>;

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepoError>;

    /// Persist every mutable column of `user`, matched by id
    async fn update(&self, user: &UserRecord) -> Result<UserRecord, RepoError>;
}

/// Postgres-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_one(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<UserRecord, RepoError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $2 LIMIT 1"
        ))
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<UserRecord, RepoError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<UserRecord>, RepoError> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ANY($1)"
        ))
        .bind(usernames)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let id = uuid::Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn update(&self, user: &UserRecord) -> Result<UserRecord, RepoError> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, bio = $5, image = $6, updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(user)
    }
}
