//! Persistence Module
//!
//! Repositories over the Conduit schema. Each repository is an
//! `async_trait` trait with a Postgres implementation built on `sqlx`, and
//! every trait is also implemented by the in-process `MemoryStore`.
//!
//! # Module Structure
//!
//! ```text
//! db/
//! ├── mod.rs        - Repositories bundle and exports
//! ├── error.rs      - RepoError and unique-constraint classification
//! ├── models.rs     - Row types and inputs
//! ├── users.rs      - users
//! ├── articles.rs   - articles (listing query composition)
//! ├── tags.rs       - article_tags
//! ├── favorites.rs  - article_favorites
//! ├── followings.rs - followings
//! ├── comments.rs   - comments
//! └── memory.rs     - MemoryStore
//! ```
//!
//! # Transactions
//!
//! Every mutating statement runs in its own transaction, committed on
//! success and rolled back (by drop) on error. No transaction spans more than
//! one repository call.

pub mod error;
pub mod models;

pub mod users;
pub mod articles;
pub mod tags;
pub mod favorites;
pub mod followings;
pub mod comments;

pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

pub use error::{Constraint, RepoError};
pub use articles::{ArticleRepository, PgArticleRepository};
pub use comments::{CommentRepository, PgCommentRepository};
pub use favorites::{FavoriteRepository, PgFavoriteRepository};
pub use followings::{FollowingRepository, PgFollowingRepository};
pub use memory::MemoryStore;
pub use tags::{ArticleTagRepository, PgArticleTagRepository};
pub use users::{PgUserRepository, UserRepository};

/// The set of repositories handed to the services at construction
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub tags: Arc<dyn ArticleTagRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub followings: Arc<dyn FollowingRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    /// Postgres repositories sharing one connection pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            articles: Arc::new(PgArticleRepository::new(pool.clone())),
            tags: Arc::new(PgArticleTagRepository::new(pool.clone())),
            favorites: Arc::new(PgFavoriteRepository::new(pool.clone())),
            followings: Arc::new(PgFollowingRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
        }
    }

    /// Every repository backed by one fresh `MemoryStore`
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            articles: store.clone(),
            tags: store.clone(),
            favorites: store.clone(),
            followings: store.clone(),
            comments: store,
        }
    }
}
