//! Error handling.
//!
//! Error types are split by the layer that produces them:
//! - **Initialization**: logger and HTTP client setup
//! - **Store**: reading and writing the JSON-backed stores
//! - **Navigation / Detection**: per-candidate collaborator failures, which the
//!   resolver converts into candidate outcomes and never propagates
//! - **Lookup**: the only failure `resolve()` surfaces to callers

mod types;

// Re-export public API
pub use types::{DetectionError, InitializationError, LookupError, NavigationError, StoreError};
