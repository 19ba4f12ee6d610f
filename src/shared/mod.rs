//! Shared Module
//!
//! Types that cross the boundary between the HTTP layer and the service
//! layer: response-shaped read models, the tri-state `Patch` used by partial
//! updates, request validation, and the input error type.
//!
//! # Overview
//!
//! Nothing in here touches the database or the network. Everything is plain
//! data plus pure functions, so it can be exercised without a running server.

/// Request validation error types
pub mod error;

/// Tri-state field updates
pub mod patch;

/// Response-shaped read models (user, profile, article, comment)
pub mod models;

/// Request validation run before any service call
pub mod validation;

/// Re-export commonly used types for convenience
pub use error::InputError;
pub use patch::Patch;
pub use models::{Article, ArticleList, Comment, Pagination, Profile, UserResponse};
