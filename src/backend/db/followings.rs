/**
 * Following Repository
 *
 * One `followings` row per ordered (follower, following) pair. Self-follows
 * are a business rule enforced by the user service; the table's CHECK
 * constraint is only a backstop.
 */

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::backend::db::error::RepoError;

#[async_trait]
pub trait FollowingRepository: Send + Sync {
    /// Fails with `UniqueViolation(Constraint::Following)` if the pair exists
    async fn insert(&self, follower: &str, following: &str) -> Result<(), RepoError>;

    /// Idempotent
    async fn delete(&self, follower: &str, following: &str) -> Result<(), RepoError>;

    async fn exists(&self, follower: &str, following: &str) -> Result<bool, RepoError>;

    /// The subset of `usernames` that `follower` follows
    async fn followed_among(
        &self,
        follower: &str,
        usernames: &[String],
    ) -> Result<HashSet<String>, RepoError>;
}

#[derive(Clone)]
pub struct PgFollowingRepository {
    pool: PgPool,
}

impl PgFollowingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowingRepository for PgFollowingRepository {
    async fn insert(&self, follower: &str, following: &str) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO followings (follower_username, following_username) VALUES ($1, $2)",
        )
        .bind(follower)
        .bind(following)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, follower: &str, following: &str) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "DELETE FROM followings WHERE follower_username = $1 AND following_username = $2",
        )
        .bind(follower)
        .bind(following)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn exists(&self, follower: &str, following: &str) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM followings
                WHERE follower_username = $1 AND following_username = $2
            )
            "#,
        )
        .bind(follower)
        .bind(following)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn followed_among(
        &self,
        follower: &str,
        usernames: &[String],
    ) -> Result<HashSet<String>, RepoError> {
        if usernames.is_empty() {
            return Ok(HashSet::new());
        }

        let followed = sqlx::query_scalar::<_, String>(
            r#"
            SELECT following_username FROM followings
            WHERE follower_username = $1 AND following_username = ANY($2)
            "#,
        )
        .bind(follower)
        .bind(usernames)
        .fetch_all(&self.pool)
        .await?;

        Ok(followed.into_iter().collect())
    }
}
