//! Client entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Runs one star request |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`ClientOptions`] | Validated settings |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

/// Connection and timing options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use self::core::Client;
pub use options::{ClientOptions, DEFAULT_URL};
