//! Backend Error Module
//!
//! The service-level error taxonomy and its HTTP rendering.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and ErrorKind
//! └── conversion.rs - IntoResponse (Conduit error envelope)
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, ErrorKind};
