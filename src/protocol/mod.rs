//! Twinkle wire protocol.
//!
//! The protocol is a two-message vocabulary carried in WebSocket text
//! frames:
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `twinkle:star` | Client → Server | Star request, sent once after open |
//! | `twinkle:starred` | Server → Client | Request confirmed |
//! | `twinkle:error` | Server → Client | Request rejected |
//!
//! Any other inbound text is ignored.

// ============================================================================
// Submodules
// ============================================================================

/// Message markers and reply classification.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{ERROR_MARKER, Reply, STAR_REQUEST, STARRED_MARKER};
