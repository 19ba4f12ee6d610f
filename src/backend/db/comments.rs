/**
 * Comment Repository
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::db::error::RepoError;
use crate::backend::db::models::{CommentRecord, NewComment};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<CommentRecord, RepoError>;

    /// Comments on one article, newest first
    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;

    async fn insert(&self, comment: NewComment) -> Result<CommentRecord, RepoError>;

    /// Fails with `RepoError::NotFound` when no comment has this id
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<CommentRecord, RepoError> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, body, author_username, article_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, body, author_username, article_id, created_at, updated_at
            FROM comments
            WHERE article_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn insert(&self, comment: NewComment) -> Result<CommentRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (id, body, author_username, article_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, body, author_username, article_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&comment.body)
        .bind(&comment.author_username)
        .bind(comment.article_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
