//! Articles Module
//!
//! Articles with their tags, favorites and comments.
//!
//! # Module Structure
//!
//! ```text
//! articles/
//! ├── mod.rs      - Module exports
//! ├── slug.rs     - Slug generation
//! └── service.rs  - ArticleService
//! ```

pub mod slug;
pub mod service;

pub use service::{ArticleFilter, ArticleService, ArticleUpdate, NewArticleInput};
