//! WebSocket transport layer.
//!
//! # Connection Lifecycle
//!
//! 1. `Connector::connect` - Single attempt, TCP + WebSocket handshake
//! 2. `Connection` - Handed to the request session as a [`MessageChannel`]
//! 3. `MessageChannel::close` - Called by the session on its terminal step
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and frame mapping |
//! | `connector` | Outbound connection attempt |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and frame mapping.
pub mod connection;

/// Outbound connection attempt.
pub mod connector;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, Inbound, MessageChannel, WsStream};
pub use connector::{Connector, DEFAULT_CONNECT_TIMEOUT};
