//! Client connection and timing options.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::session::RESPONSE_TIMEOUT;
use crate::transport::DEFAULT_CONNECT_TIMEOUT;

// ============================================================================
// Constants
// ============================================================================

/// Endpoint used when none is given.
pub const DEFAULT_URL: &str = "ws://localhost:9000";

// ============================================================================
// ClientOptions
// ============================================================================

/// Validated client settings.
///
/// Built by [`ClientBuilder`](super::ClientBuilder); the URL scheme is
/// guaranteed to be `ws` or `wss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// WebSocket endpoint.
    pub url: Url,
    /// How long to wait for the confirmation after sending the request.
    pub response_timeout: Duration,
    /// Bound on the connection attempt.
    pub connect_timeout: Duration,
}

impl ClientOptions {
    /// Options for `url` with default timeouts.
    #[inline]
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            response_timeout: RESPONSE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
