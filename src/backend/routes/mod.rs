//! Route Configuration Module
//!
//! HTTP handlers for the Conduit API, grouped by resource. Handlers validate
//! input, call one service method and wrap the result in its JSON envelope.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs       - Module exports and documentation
//! ├── router.rs    - Main router creation
//! ├── extract.rs   - JsonBody / QueryParams extractors
//! ├── types.rs     - Request and response envelopes
//! ├── users.rs     - /api/users, /api/user
//! ├── profiles.rs  - /api/profiles
//! ├── articles.rs  - /api/articles (+ feed, favorite)
//! ├── comments.rs  - /api/articles/{slug}/comments
//! └── tags.rs      - /api/tags
//! ```
//!
//! # Authentication
//!
//! Handlers that take `AuthUser` require an `Authorization: Token <jwt>`
//! header; handlers that take `MaybeAuthUser` also serve anonymous callers.

/// Main router creation
pub mod router;

pub mod extract;
pub mod types;

pub mod users;
pub mod profiles;
pub mod articles;
pub mod comments;
pub mod tags;

pub use router::create_router;
