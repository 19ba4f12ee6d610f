/**
 * Article Service
 *
 * Articles, tags, favorites and comments. Reads come back as response-shaped
 * `Article` / `Comment` values with their derived fields filled in for the
 * viewer: tag list, favorite count, favorited flag, and the author's profile.
 *
 * # Read-model assembly
 *
 * A page of articles is assembled with one batch call per derived field
 * (tags, counts, favorited subset, authors, followed subset), not one query
 * per article.
 *
 * # Caching
 *
 * Single-article reads by slug go through the cache as `ArticleRecord`
 * entries under `article:{slug}`. Derived fields are always computed fresh.
 * Updates and deletes invalidate the entry.
 *
 * # Article and tag writes
 *
 * The article row and its tag rows are written in separate transactions. If
 * the tag insert fails, the article is deleted again before the error is
 * returned.
 */

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::backend::articles::slug::generate_slug;
use crate::backend::cache::{article_key, Cache};
use crate::backend::db::models::{
    ArticleQuery, ArticleRecord, CommentRecord, NewArticle, NewComment,
};
use crate::backend::db::{Constraint, RepoError, Repositories};
use crate::backend::error::BackendError;
use crate::backend::users::UserService;
use crate::shared::{Article, ArticleList, Comment, Pagination, Profile};

#[derive(Debug, Clone)]
pub struct NewArticleInput {
    pub title: String,
    pub description: String,
    pub body: String,
    /// Already checked for blanks and duplicates
    pub tag_list: Vec<String>,
}

/// Partial update; `None` leaves the stored value alone
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

/// Listing filter; present predicates are AND-ed
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    /// Username whose favorites to list
    pub favorited: Option<String>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct ArticleService {
    repos: Repositories,
    users: UserService,
    cache: Cache,
}

impl ArticleService {
    pub fn new(repos: Repositories, users: UserService, cache: Cache) -> Self {
        Self {
            repos,
            users,
            cache,
        }
    }

    pub async fn create_article(
        &self,
        author: &str,
        input: NewArticleInput,
    ) -> Result<Article, BackendError> {
        let record = self
            .repos
            .articles
            .insert(NewArticle {
                slug: generate_slug(&input.title),
                title: input.title,
                description: input.description,
                body: input.body,
                author_username: author.to_string(),
            })
            .await
            .map_err(|e| BackendError::internal("failed to insert article", e))?;

        if let Err(e) = self.repos.tags.insert_many(record.id, &input.tag_list).await {
            if let Err(cleanup) = self.repos.articles.delete(record.id).await {
                tracing::error!(
                    error = %cleanup,
                    "failed to remove article {} after tag insert failure",
                    record.slug
                );
            }
            return Err(BackendError::internal("failed to insert article tags", e));
        }

        tracing::info!("Article created: {} by {}", record.slug, author);
        self.assemble_one(Some(author), record).await
    }

    /// Single article with derived fields for `viewer` (anonymous when `None`)
    pub async fn get_article_by_slug(
        &self,
        viewer: Option<&str>,
        slug: &str,
    ) -> Result<Article, BackendError> {
        let key = article_key(slug);
        if let Some(record) = self.cache.get::<ArticleRecord>(&key).await {
            match self.assemble_one(viewer, record).await {
                Ok(article) => return Ok(article),
                Err(_) => {
                    tracing::warn!("stale cache entry {}, reloading", key);
                    self.cache.invalidate(&key).await;
                }
            }
        }

        let record = self.find_article(slug).await?;
        // An update committed between the read and this write is masked until the TTL expires.
        self.cache.set(&key, &record).await;
        self.assemble_one(viewer, record).await
    }

    /// Author-only partial update; a changed title mints a new slug
    pub async fn update_article_by_slug(
        &self,
        author: &str,
        slug: &str,
        update: ArticleUpdate,
    ) -> Result<Article, BackendError> {
        let mut record = self.find_article(slug).await?;
        if record.author_username != author {
            tracing::warn!("{} tried to edit {} by {}", author, slug, record.author_username);
            return Err(BackendError::forbidden("only the author may edit this article"));
        }

        if let Some(title) = update.title {
            if title != record.title {
                record.slug = generate_slug(&title);
            }
            record.title = title;
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(body) = update.body {
            record.body = body;
        }

        let updated = self
            .repos
            .articles
            .update(&record)
            .await
            .map_err(|e| BackendError::from_repo("article", e))?;
        self.cache.invalidate(&article_key(slug)).await;

        tracing::info!("Article updated: {} (was {})", updated.slug, slug);
        self.assemble_one(Some(author), updated).await
    }

    /// Author-only; tags, favorites and comments go with it
    pub async fn delete_article(&self, slug: &str, username: &str) -> Result<(), BackendError> {
        let record = self.find_article(slug).await?;
        if record.author_username != username {
            tracing::warn!("{} tried to delete {} by {}", username, slug, record.author_username);
            return Err(BackendError::forbidden("only the author may delete this article"));
        }

        self.repos
            .articles
            .delete(record.id)
            .await
            .map_err(|e| BackendError::from_repo("article", e))?;
        self.cache.invalidate(&article_key(slug)).await;

        tracing::info!("Article deleted: {}", slug);
        Ok(())
    }

    pub async fn get_articles(
        &self,
        filter: &ArticleFilter,
        viewer: Option<&str>,
    ) -> Result<ArticleList, BackendError> {
        let query = ArticleQuery {
            tag: filter.tag.clone(),
            author: filter.author.clone(),
            favorited_by: filter.favorited.clone(),
            followed_by: None,
            limit: filter.pagination.limit,
            offset: filter.pagination.offset,
        };
        self.list(&query, viewer).await
    }

    /// Articles by authors `username` follows, newest first
    pub async fn get_articles_feed(
        &self,
        username: &str,
        pagination: Pagination,
    ) -> Result<ArticleList, BackendError> {
        let query = ArticleQuery {
            followed_by: Some(username.to_string()),
            limit: pagination.limit,
            offset: pagination.offset,
            ..Default::default()
        };
        self.list(&query, Some(username)).await
    }

    /// Idempotent: favoriting twice leaves one favorite row
    pub async fn favorite_article_by_slug(
        &self,
        username: &str,
        slug: &str,
    ) -> Result<Article, BackendError> {
        let record = self.find_article(slug).await?;

        match self.repos.favorites.insert(username, record.id).await {
            Ok(()) => tracing::info!("{} favorited {}", username, slug),
            Err(RepoError::UniqueViolation(Constraint::ArticleFavorite)) => {
                tracing::debug!("{} already favorited {}", username, slug);
            }
            Err(e) => return Err(BackendError::from_repo("article", e)),
        }

        self.assemble_one(Some(username), record).await
    }

    pub async fn unfavorite_article_by_slug(
        &self,
        username: &str,
        slug: &str,
    ) -> Result<Article, BackendError> {
        let record = self.find_article(slug).await?;

        self.repos
            .favorites
            .delete(username, record.id)
            .await
            .map_err(|e| BackendError::internal("failed to delete favorite", e))?;

        tracing::info!("{} unfavorited {}", username, slug);
        self.assemble_one(Some(username), record).await
    }

    /// Distinct tag names, ascending
    pub async fn get_all_tags(&self) -> Result<Vec<String>, BackendError> {
        self.repos
            .tags
            .list_all()
            .await
            .map_err(|e| BackendError::internal("failed to list tags", e))
    }

    pub async fn create_comment(
        &self,
        author: &str,
        slug: &str,
        body: String,
    ) -> Result<Comment, BackendError> {
        let article = self.find_article(slug).await?;
        let record = self
            .repos
            .comments
            .insert(NewComment {
                body,
                author_username: author.to_string(),
                article_id: article.id,
            })
            .await
            .map_err(|e| BackendError::from_repo("article", e))?;

        tracing::info!("Comment {} added to {} by {}", record.id, slug, author);
        let mut comments = self.assemble_comments(Some(author), vec![record]).await?;
        comments.pop().ok_or(BackendError::Internal)
    }

    /// Comments on an article, newest first
    pub async fn get_comments(
        &self,
        slug: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<Comment>, BackendError> {
        let article = self.find_article(slug).await?;
        let records = self
            .repos
            .comments
            .list_for_article(article.id)
            .await
            .map_err(|e| BackendError::internal("failed to list comments", e))?;
        self.assemble_comments(viewer, records).await
    }

    pub async fn get_comment(
        &self,
        viewer: Option<&str>,
        id: Uuid,
    ) -> Result<Comment, BackendError> {
        let record = self.find_comment(id).await?;
        let mut comments = self.assemble_comments(viewer, vec![record]).await?;
        comments.pop().ok_or(BackendError::Internal)
    }

    /// Author-only delete
    pub async fn delete_comment_by_id(&self, id: Uuid, username: &str) -> Result<(), BackendError> {
        let record = self.find_comment(id).await?;
        self.delete_comment_record(record, username).await
    }

    /// Like `delete_comment_by_id`, but the comment must belong to `slug`
    pub async fn delete_comment(
        &self,
        slug: &str,
        id: Uuid,
        username: &str,
    ) -> Result<(), BackendError> {
        let article = self.find_article(slug).await?;
        let record = self.find_comment(id).await?;
        if record.article_id != article.id {
            return Err(BackendError::not_found("comment"));
        }
        self.delete_comment_record(record, username).await
    }

    async fn delete_comment_record(
        &self,
        record: CommentRecord,
        username: &str,
    ) -> Result<(), BackendError> {
        if record.author_username != username {
            tracing::warn!("{} tried to delete comment {}", username, record.id);
            return Err(BackendError::forbidden("only the author may delete this comment"));
        }

        self.repos
            .comments
            .delete(record.id)
            .await
            .map_err(|e| BackendError::from_repo("comment", e))?;

        tracing::info!("Comment deleted: {}", record.id);
        Ok(())
    }

    async fn find_article(&self, slug: &str) -> Result<ArticleRecord, BackendError> {
        self.repos
            .articles
            .find_by_slug(slug)
            .await
            .map_err(|e| BackendError::from_repo("article", e))
    }

    async fn find_comment(&self, id: Uuid) -> Result<CommentRecord, BackendError> {
        self.repos
            .comments
            .find_by_id(id)
            .await
            .map_err(|e| BackendError::from_repo("comment", e))
    }

    async fn list(
        &self,
        query: &ArticleQuery,
        viewer: Option<&str>,
    ) -> Result<ArticleList, BackendError> {
        let records = self
            .repos
            .articles
            .list(query)
            .await
            .map_err(|e| BackendError::internal("failed to list articles", e))?;
        let articles_count = self
            .repos
            .articles
            .count(query)
            .await
            .map_err(|e| BackendError::internal("failed to count articles", e))?;

        Ok(ArticleList {
            articles: self.assemble(viewer, records).await?,
            articles_count,
        })
    }

    async fn assemble_one(
        &self,
        viewer: Option<&str>,
        record: ArticleRecord,
    ) -> Result<Article, BackendError> {
        let mut articles = self.assemble(viewer, vec![record]).await?;
        articles.pop().ok_or(BackendError::Internal)
    }

    async fn assemble(
        &self,
        viewer: Option<&str>,
        records: Vec<ArticleRecord>,
    ) -> Result<Vec<Article>, BackendError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut tags = self
            .repos
            .tags
            .list_for_articles(&ids)
            .await
            .map_err(|e| BackendError::internal("failed to load article tags", e))?;
        let counts = self
            .repos
            .favorites
            .counts(&ids)
            .await
            .map_err(|e| BackendError::internal("failed to count favorites", e))?;
        let favorited: HashSet<Uuid> = match viewer {
            Some(viewer) => self
                .repos
                .favorites
                .favorited_among(viewer, &ids)
                .await
                .map_err(|e| BackendError::internal("favorite check failed", e))?,
            None => HashSet::new(),
        };
        let authors = self
            .author_profiles(viewer, records.iter().map(|r| r.author_username.as_str()))
            .await?;

        records
            .into_iter()
            .map(|record| -> Result<Article, BackendError> {
                let author = authors
                    .get(&record.author_username)
                    .cloned()
                    .ok_or_else(|| {
                        BackendError::internal(
                            "article author missing",
                            format!("{} by {}", record.slug, record.author_username),
                        )
                    })?;
                Ok(Article {
                    tag_list: tags.remove(&record.id).unwrap_or_default(),
                    favorited: favorited.contains(&record.id),
                    favorites_count: counts.get(&record.id).copied().unwrap_or(0),
                    author,
                    slug: record.slug,
                    title: record.title,
                    description: record.description,
                    body: record.body,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                })
            })
            .collect()
    }

    async fn assemble_comments(
        &self,
        viewer: Option<&str>,
        records: Vec<CommentRecord>,
    ) -> Result<Vec<Comment>, BackendError> {
        let authors = self
            .author_profiles(viewer, records.iter().map(|r| r.author_username.as_str()))
            .await?;

        records
            .into_iter()
            .map(|record| -> Result<Comment, BackendError> {
                let author = authors
                    .get(&record.author_username)
                    .cloned()
                    .ok_or_else(|| {
                        BackendError::internal(
                            "comment author missing",
                            format!("{} by {}", record.id, record.author_username),
                        )
                    })?;
                Ok(Comment {
                    id: record.id,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                    body: record.body,
                    author,
                })
            })
            .collect()
    }

    async fn author_profiles<'a>(
        &self,
        viewer: Option<&str>,
        usernames: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, Profile>, BackendError> {
        let unique: Vec<String> = usernames
            .collect::<HashSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.users.profiles(viewer, &unique).await
    }
}
