/**
 * Article Favorite Repository
 *
 * At most one `article_favorites` row exists per (username, article) pair.
 * A duplicate insert surfaces as
 * `RepoError::UniqueViolation(Constraint::ArticleFavorite)`; deletes are
 * idempotent.
 */

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::db::error::RepoError;

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn insert(&self, username: &str, article_id: Uuid) -> Result<(), RepoError>;

    /// Remove the favorite row if present; a missing row is not an error
    async fn delete(&self, username: &str, article_id: Uuid) -> Result<(), RepoError>;

    /// Favorite counts for each article; articles without favorites are absent
    async fn counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, RepoError>;

    /// The subset of `article_ids` favorited by `username`
    async fn favorited_among(
        &self,
        username: &str,
        article_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError>;
}

#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn insert(&self, username: &str, article_id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO article_favorites (username, article_id) VALUES ($1, $2)")
            .bind(username)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, username: &str, article_id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM article_favorites WHERE username = $1 AND article_id = $2")
            .bind(username)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, RepoError> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT article_id, COUNT(*)
            FROM article_favorites
            WHERE article_id = ANY($1)
            GROUP BY article_id
            "#,
        )
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn favorited_among(
        &self,
        username: &str,
        article_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        if article_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT article_id FROM article_favorites WHERE username = $1 AND article_id = ANY($2)",
        )
        .bind(username)
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }
}
