/**
 * Article Repository
 *
 * Parameterized SQL against the `articles` table. Listing queries are
 * composed with `QueryBuilder`: each optional predicate becomes an AND-ed
 * clause, and tag/favorite/feed membership is expressed as a subquery on the
 * corresponding link table.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::backend::db::error::RepoError;
use crate::backend::db::models::{ArticleQuery, ArticleRecord, NewArticle};

const ARTICLE_COLUMNS: &str =
    "a.id, a.slug, a.title, a.description, a.body, a.author_username, a.created_at, a.updated_at";

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<ArticleRecord, RepoError>;

    /// One page of articles matching `query`, newest first
    async fn list(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>, RepoError>;

    /// Number of articles matching `query`, ignoring limit and offset
    async fn count(&self, query: &ArticleQuery) -> Result<i64, RepoError>;

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError>;

    /// Persist slug, title, description and body of `article`, matched by id
    async fn update(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError>;

    /// Delete an article; its tags, favorites and comments go with it
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Postgres-backed article repository
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause for `query` to `builder`
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ArticleQuery) {
    builder.push(" WHERE TRUE");

    if let Some(tag) = &query.tag {
        builder
            .push(" AND a.id IN (SELECT article_id FROM article_tags WHERE tag_name = ")
            .push_bind(tag.clone())
            .push(")");
    }
    if let Some(author) = &query.author {
        builder
            .push(" AND a.author_username = ")
            .push_bind(author.clone());
    }
    if let Some(username) = &query.favorited_by {
        builder
            .push(" AND a.id IN (SELECT article_id FROM article_favorites WHERE username = ")
            .push_bind(username.clone())
            .push(")");
    }
    if let Some(follower) = &query.followed_by {
        builder
            .push(" AND a.author_username IN (SELECT following_username FROM followings WHERE follower_username = ")
            .push_bind(follower.clone())
            .push(")");
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<ArticleRecord, RepoError> {
        let article = sqlx::query_as::<_, ArticleRecord>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.slug = $1"
        ))
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    async fn list(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>, RepoError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a"
        ));
        push_filters(&mut builder, query);
        builder
            .push(" ORDER BY a.created_at DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let articles = builder
            .build_query_as::<ArticleRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(articles)
    }

    async fn count(&self, query: &ArticleQuery) -> Result<i64, RepoError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles a");
        push_filters(&mut builder, query);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let article = sqlx::query_as::<_, ArticleRecord>(
            r#"
            INSERT INTO articles AS a (id, slug, title, description, body, author_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING a.id, a.slug, a.title, a.description, a.body, a.author_username, a.created_at, a.updated_at
            "#,
        )
        .bind(id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(&article.author_username)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(article)
    }

    async fn update(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let article = sqlx::query_as::<_, ArticleRecord>(
            r#"
            UPDATE articles AS a
            SET slug = $2, title = $3, description = $4, body = $5, updated_at = $6
            WHERE a.id = $1
            RETURNING a.id, a.slug, a.title, a.description, a.body, a.author_username, a.created_at, a.updated_at
            "#,
        )
        .bind(article.id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(article)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
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
