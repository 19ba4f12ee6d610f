/**
 * In-Memory Store
 *
 * A process-local implementation of every repository trait, guarded by a
 * single `tokio::sync::RwLock`. It enforces the same unique constraints as
 * the Postgres schema, rejects rows that reference a missing user or
 * article, cascades article deletes and username renames the way the foreign
 * keys do, and orders listings newest first.
 *
 * The server falls back to it when `DATABASE_URL` is not set; the unit tests
 * run every service against it.
 */

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::db::articles::ArticleRepository;
use crate::backend::db::comments::CommentRepository;
use crate::backend::db::error::{Constraint, RepoError};
use crate::backend::db::favorites::FavoriteRepository;
use crate::backend::db::followings::FollowingRepository;
use crate::backend::db::models::{
    ArticleQuery, ArticleRecord, CommentRecord, NewArticle, NewComment, NewUser, UserRecord,
};
use crate::backend::db::tags::ArticleTagRepository;
use crate::backend::db::users::UserRepository;

// Names Postgres gives the schema's foreign keys
const ARTICLES_AUTHOR_FKEY: &str = "articles_author_username_fkey";
const ARTICLE_TAGS_ARTICLE_FKEY: &str = "article_tags_article_id_fkey";
const FAVORITES_USER_FKEY: &str = "article_favorites_username_fkey";
const FAVORITES_ARTICLE_FKEY: &str = "article_favorites_article_id_fkey";
const FOLLOWINGS_FOLLOWER_FKEY: &str = "followings_follower_username_fkey";
const FOLLOWINGS_FOLLOWING_FKEY: &str = "followings_following_username_fkey";
const COMMENTS_AUTHOR_FKEY: &str = "comments_author_username_fkey";
const COMMENTS_ARTICLE_FKEY: &str = "comments_article_id_fkey";

#[derive(Debug, Default)]
struct Tables {
    // Every Vec is kept in insertion order.
    users: Vec<UserRecord>,
    articles: Vec<ArticleRecord>,
    tags: Vec<(Uuid, String)>,
    favorites: Vec<(String, Uuid)>,
    followings: Vec<(String, String)>,
    comments: Vec<CommentRecord>,
}

impl Tables {
    fn require_user(&self, username: &str, fkey: &str) -> Result<(), RepoError> {
        if self.users.iter().any(|u| u.username == username) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(fkey.to_string()))
        }
    }

    fn require_article(&self, id: Uuid, fkey: &str) -> Result<(), RepoError> {
        if self.articles.iter().any(|a| a.id == id) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(fkey.to_string()))
        }
    }

    fn matches(&self, article: &ArticleRecord, query: &ArticleQuery) -> bool {
        if let Some(tag) = &query.tag {
            if !self.tags.iter().any(|(id, name)| *id == article.id && name == tag) {
                return false;
            }
        }
        if let Some(author) = &query.author {
            if &article.author_username != author {
                return false;
            }
        }
        if let Some(username) = &query.favorited_by {
            if !self
                .favorites
                .iter()
                .any(|(name, id)| name == username && *id == article.id)
            {
                return false;
            }
        }
        if let Some(follower) = &query.followed_by {
            if !self
                .followings
                .iter()
                .any(|(from, to)| from == follower && to == &article.author_username)
            {
                return false;
            }
        }
        true
    }

    /// Matching articles, newest first; ties keep the later insert first
    fn matching(&self, query: &ArticleQuery) -> Vec<&ArticleRecord> {
        let mut found: Vec<&ArticleRecord> = self
            .articles
            .iter()
            .rev()
            .filter(|article| self.matches(article, query))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    fn rename_user(&mut self, old: &str, new: &str) {
        for article in self.articles.iter_mut().filter(|a| a.author_username == old) {
            article.author_username = new.to_string();
        }
        for comment in self.comments.iter_mut().filter(|c| c.author_username == old) {
            comment.author_username = new.to_string();
        }
        for (name, _) in self.favorites.iter_mut().filter(|(name, _)| name == old) {
            *name = new.to_string();
        }
        for (from, to) in self.followings.iter_mut() {
            if from == old {
                *from = new.to_string();
            }
            if to == old {
                *to = new.to_string();
            }
        }
    }
}

/// In-process store implementing every repository trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_one(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<UserRecord, RepoError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| Some(u.email.as_str()) == email || Some(u.username.as_str()) == username)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_username(&self, username: &str) -> Result<UserRecord, RepoError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<UserRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| usernames.contains(&u.username))
            .cloned()
            .collect())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::UniqueViolation(Constraint::UserEmail));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::UniqueViolation(Constraint::UserUsername));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            bio: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn update(&self, user: &UserRecord) -> Result<UserRecord, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::UniqueViolation(Constraint::UserEmail));
        }
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::UniqueViolation(Constraint::UserUsername));
        }

        let index = tables
            .users
            .iter()
            .position(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        let old_username = tables.users[index].username.clone();

        let stored = &mut tables.users[index];
        stored.email = user.email.clone();
        stored.username = user.username.clone();
        stored.password_hash = user.password_hash.clone();
        stored.bio = user.bio.clone();
        stored.image = user.image.clone();
        stored.updated_at = Utc::now();
        let record = stored.clone();

        if old_username != record.username {
            tables.rename_user(&old_username, &record.username);
        }
        Ok(record)
    }
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<ArticleRecord, RepoError> {
        let tables = self.tables.read().await;
        tables
            .articles
            .iter()
            .find(|a| a.slug == slug)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .matching(query)
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &ArticleQuery) -> Result<i64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.matching(query).len() as i64)
    }

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.articles.iter().any(|a| a.slug == article.slug) {
            return Err(RepoError::UniqueViolation(Constraint::ArticleSlug));
        }
        tables.require_user(&article.author_username, ARTICLES_AUTHOR_FKEY)?;

        let now = Utc::now();
        let record = ArticleRecord {
            id: Uuid::new_v4(),
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            author_username: article.author_username,
            created_at: now,
            updated_at: now,
        };
        tables.articles.push(record.clone());
        Ok(record)
    }

    async fn update(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .articles
            .iter()
            .any(|a| a.id != article.id && a.slug == article.slug)
        {
            return Err(RepoError::UniqueViolation(Constraint::ArticleSlug));
        }

        let stored = tables
            .articles
            .iter_mut()
            .find(|a| a.id == article.id)
            .ok_or(RepoError::NotFound)?;
        stored.slug = article.slug.clone();
        stored.title = article.title.clone();
        stored.description = article.description.clone();
        stored.body = article.body.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        if tables.articles.len() == before {
            return Err(RepoError::NotFound);
        }

        tables.tags.retain(|(article_id, _)| *article_id != id);
        tables.favorites.retain(|(_, article_id)| *article_id != id);
        tables.comments.retain(|c| c.article_id != id);
        Ok(())
    }
}

#[async_trait]
impl ArticleTagRepository for MemoryStore {
    async fn insert_many(&self, article_id: Uuid, tags: &[String]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let mut pending = HashSet::new();
        for tag in tags {
            let exists = tables
                .tags
                .iter()
                .any(|(id, name)| *id == article_id && name == tag);
            if exists || !pending.insert(tag) {
                return Err(RepoError::UniqueViolation(Constraint::ArticleTag));
            }
        }
        if !tags.is_empty() {
            tables.require_article(article_id, ARTICLE_TAGS_ARTICLE_FKEY)?;
        }

        tables
            .tags
            .extend(tags.iter().map(|tag| (article_id, tag.clone())));
        Ok(())
    }

    async fn list_for_articles(
        &self,
        article_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<String>>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (id, name) in tables.tags.iter().filter(|(id, _)| article_ids.contains(id)) {
            tags.entry(*id).or_default().push(name.clone());
        }
        for list in tags.values_mut() {
            list.sort();
        }
        Ok(tags)
    }

    async fn list_all(&self) -> Result<Vec<String>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<String> = tables
            .tags
            .iter()
            .map(|(_, name)| name.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tags.sort();
        Ok(tags)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn insert(&self, username: &str, article_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .favorites
            .iter()
            .any(|(name, id)| name == username && *id == article_id)
        {
            return Err(RepoError::UniqueViolation(Constraint::ArticleFavorite));
        }
        tables.require_user(username, FAVORITES_USER_FKEY)?;
        tables.require_article(article_id, FAVORITES_ARTICLE_FKEY)?;

        tables.favorites.push((username.to_string(), article_id));
        Ok(())
    }

    async fn delete(&self, username: &str, article_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .favorites
            .retain(|(name, id)| !(name == username && *id == article_id));
        Ok(())
    }

    async fn counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for (_, id) in tables.favorites.iter().filter(|(_, id)| article_ids.contains(id)) {
            *counts.entry(*id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn favorited_among(
        &self,
        username: &str,
        article_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .iter()
            .filter(|(name, id)| name == username && article_ids.contains(id))
            .map(|(_, id)| *id)
            .collect())
    }
}

#[async_trait]
impl FollowingRepository for MemoryStore {
    async fn insert(&self, follower: &str, following: &str) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .followings
            .iter()
            .any(|(from, to)| from == follower && to == following)
        {
            return Err(RepoError::UniqueViolation(Constraint::Following));
        }
        tables.require_user(follower, FOLLOWINGS_FOLLOWER_FKEY)?;
        tables.require_user(following, FOLLOWINGS_FOLLOWING_FKEY)?;

        tables
            .followings
            .push((follower.to_string(), following.to_string()));
        Ok(())
    }

    async fn delete(&self, follower: &str, following: &str) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .followings
            .retain(|(from, to)| !(from == follower && to == following));
        Ok(())
    }

    async fn exists(&self, follower: &str, following: &str) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .followings
            .iter()
            .any(|(from, to)| from == follower && to == following))
    }

    async fn followed_among(
        &self,
        follower: &str,
        usernames: &[String],
    ) -> Result<HashSet<String>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .followings
            .iter()
            .filter(|(from, to)| from == follower && usernames.contains(to))
            .map(|(_, to)| to.clone())
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<CommentRecord, RepoError> {
        let tables = self.tables.read().await;
        tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_for_article(&self, article_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentRecord> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn insert(&self, comment: NewComment) -> Result<CommentRecord, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(&comment.author_username, COMMENTS_AUTHOR_FKEY)?;
        tables.require_article(comment.article_id, COMMENTS_ARTICLE_FKEY)?;

        let now = Utc::now();
        let record = CommentRecord {
            id: Uuid::new_v4(),
            body: comment.body,
            author_username: comment.author_username,
            article_id: comment.article_id,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
