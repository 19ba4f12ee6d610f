//! Conduit - Main Library
//!
//! A RealWorld ("Conduit") social blogging backend: users register, write
//! articles, tag, favorite and comment on them, and follow each other.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain types that cross the HTTP/service boundary
//!   - Read models (user, profile, article, comment)
//!   - Tri-state `Patch<T>` for partial updates
//!   - Request validation and `InputError`
//!
//! - **`backend`** - Everything that runs in the server
//!   - Axum router, handlers and auth extractors
//!   - `UserService`, `ArticleService`, `AuthService`
//!   - Postgres (sqlx) and in-memory repositories
//!   - Optional Redis article cache
//!
//! # Usage
//!
//! ```rust,no_run
//! use conduit::backend::server::{create_app, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::InputError` for rejected client input (422)
//! - `backend::db::RepoError` for persistence failures
//! - `backend::error::BackendError` for everything a service returns; it
//!   renders as `{"errors":{"body":[...]}}` with the mapped status

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
