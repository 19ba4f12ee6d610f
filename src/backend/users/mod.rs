//! Users Module
//!
//! User accounts, profiles and the follow graph.

pub mod service;

pub use service::{NewUserInput, UserLookup, UserService, UserUpdate};
