//! Authentication Module
//!
//! Token issuing, password hashing and the login/registration flows.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs        - Module exports and documentation
//! ├── sessions.rs   - JWT issuing and verification
//! ├── passwords.rs  - bcrypt hashing on the blocking pool
//! └── service.rs    - AuthService (login, register, current user)
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, username and password → user created → token returned
//! 2. **Login**: email or username, and password → hash verified → token returned
//! 3. **Current user**: token verified, subject must still exist → user loaded → fresh token returned
//!
//! Tokens are HS256 JWTs whose subject is the username. They expire after
//! the configured lifetime (`JWT_TTL_HOURS`, 72 by default).

/// JWT token generation and validation
pub mod sessions;

/// bcrypt hashing
pub mod passwords;

/// Login, registration, current user
pub mod service;

pub use service::{AuthService, Identity, LoginInput};
pub use sessions::{Claims, TokenIssuer};
