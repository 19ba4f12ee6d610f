/**
 * Article Tag Repository
 *
 * `article_tags` holds one row per (article, tag name) pair. There is no tag
 * entity beyond the string itself.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::backend::db::error::RepoError;

#[async_trait]
pub trait ArticleTagRepository: Send + Sync {
    /// Attach `tags` to an article in one statement; an empty slice is a no-op
    async fn insert_many(&self, article_id: Uuid, tags: &[String]) -> Result<(), RepoError>;

    /// Tags of each article in `article_ids`, ascending; untagged articles are absent
    async fn list_for_articles(
        &self,
        article_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<String>>, RepoError>;

    /// Distinct tag names across all articles, ascending
    async fn list_all(&self) -> Result<Vec<String>, RepoError>;
}

#[derive(Clone)]
pub struct PgArticleTagRepository {
    pool: PgPool,
}

impl PgArticleTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleTagRepository for PgArticleTagRepository {
    async fn insert_many(&self, article_id: Uuid, tags: &[String]) -> Result<(), RepoError> {
        if tags.is_empty() {
            return Ok(());
        }

        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO article_tags (article_id, tag_name) ");
        builder.push_values(tags, |mut row, tag| {
            row.push_bind(article_id).push_bind(tag.clone());
        });

        let mut tx = self.pool.begin().await?;
        builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn list_for_articles(
        &self,
        article_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<String>>, RepoError> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT article_id, tag_name
            FROM article_tags
            WHERE article_id = ANY($1)
            ORDER BY tag_name
            "#,
        )
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (article_id, tag) in rows {
            tags.entry(article_id).or_default().push(tag);
        }
        Ok(tags)
    }

    async fn list_all(&self) -> Result<Vec<String>, RepoError> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT tag_name FROM article_tags ORDER BY tag_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
