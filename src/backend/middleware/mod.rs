//! Middleware Module
//!
//! Request extractors shared by the route handlers.
//!
//! - **`auth`** - `AuthUser` / `MaybeAuthUser` from the `Authorization` header

pub mod auth;

pub use auth::{AuthUser, MaybeAuthUser};
