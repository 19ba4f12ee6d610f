//! Backend Module
//!
//! All server-side code for the Conduit API: persistence, domain services,
//! authentication, caching and the Axum HTTP layer.
//!
//! # Architecture
//!
//! Requests flow through the layers top to bottom:
//!
//! - **`routes`** - HTTP handlers; decode, validate, call one service method
//! - **`middleware`** - `AuthUser` / `MaybeAuthUser` extractors
//! - **`auth`**, **`users`**, **`articles`** - domain services
//! - **`cache`** - best-effort article cache (Redis)
//! - **`db`** - repository traits with Postgres and in-memory implementations
//! - **`error`** - `BackendError` and its HTTP rendering
//! - **`server`** - configuration, state and startup
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs        - Module exports and documentation
//! ├── server/       - Server initialization and state
//! ├── routes/       - Route configuration and handlers
//! ├── middleware/   - Request extractors
//! ├── auth/         - Tokens, passwords, AuthService
//! ├── users/        - UserService
//! ├── articles/     - ArticleService, slugs
//! ├── cache/        - Cache helper and Redis store
//! ├── db/           - Repositories
//! └── error/        - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the services; services hold their repositories, cache
//! and token issuer, all constructed once at startup and injected. There are
//! no process-wide singletons.

/// Server initialization and configuration
pub mod server;

/// HTTP route configuration
pub mod routes;

/// Request extractors
pub mod middleware;

/// Authentication and token handling
pub mod auth;

/// User accounts and profiles
pub mod users;

/// Articles, tags, favorites and comments
pub mod articles;

/// Article cache
pub mod cache;

/// Persistence
pub mod db;

/// Backend-specific error types
pub mod error;

pub use error::{BackendError, ErrorKind};
pub use server::create_app;
