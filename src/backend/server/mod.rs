//! Server Module
//!
//! Bootstrapping for the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports and documentation
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - Environment configuration, database and cache loading
//! └── init.rs    - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `Config::from_env()` reads and validates settings
//! 2. **Database**: Postgres pool and migrations, or the in-memory store
//! 3. **Cache**: Redis when configured and reachable, otherwise disabled
//! 4. **Router**: services wired into `AppState`, routes configured

pub mod config;
pub mod state;
pub mod init;

pub use config::{Config, ConfigError, StartupError};
pub use init::create_app;
pub use state::AppState;
