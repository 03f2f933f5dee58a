//! Message markers and reply classification.

// ============================================================================
// Constants
// ============================================================================

/// Request marker sent by the client right after the connection opens.
pub const STAR_REQUEST: &str = "twinkle:star";

/// Marker the server sends when it rejects the request.
pub const ERROR_MARKER: &str = "twinkle:error";

/// Marker the server sends when it confirms the request.
pub const STARRED_MARKER: &str = "twinkle:starred";

// ============================================================================
// Reply
// ============================================================================

/// Classified inbound text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Server rejected the request.
    Error,
    /// Server confirmed the request.
    Confirmed,
    /// Anything else. Ignored for forward compatibility.
    Unknown,
}

impl Reply {
    /// Classifies an inbound text frame.
    ///
    /// Matching is exact and case sensitive.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text {
            ERROR_MARKER => Self::Error,
            STARRED_MARKER => Self::Confirmed,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
