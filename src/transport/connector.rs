//! Outbound WebSocket connector.
//!
//! Performs a single connection attempt, bounded by a connect timeout.
//! There is no retry: a failed attempt is final for the run.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

use super::Connection;

// ============================================================================
// Constants
// ============================================================================

/// Default bound on TCP connect plus WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Connector
// ============================================================================

/// Establishes the one connection a run uses.
///
/// # Example
///
/// ```ignore
/// use twinkle_client::transport::Connector;
///
/// let url = url::Url::parse("ws://localhost:9000")?;
/// let connection = Connector::default().connect(&url).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Connector {
    /// Bound on the whole connection attempt.
    connect_timeout: Duration,
}

impl Default for Connector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Connector {
    /// Creates a connector with the given connect timeout.
    #[inline]
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Returns the connect timeout.
    #[inline]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Connects to `url` and completes the WebSocket handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the attempt exceeds the connect timeout
    /// - [`Error::Connection`] if the host is unreachable, refuses the
    ///   connection, or the handshake fails
    pub async fn connect(&self, url: &Url) -> Result<Connection> {
        debug!(%url, "Connecting");

        let attempt = timeout(self.connect_timeout, connect_async(url.as_str())).await;

        let (stream, response) = attempt
            .map_err(|_| {
                warn!(%url, "Connection attempt timed out");
                Error::connection_timeout(timeout_ms(self.connect_timeout))
            })?
            .map_err(|e| {
                warn!(%url, error = %e, "Connection attempt failed");
                Error::connection(e.to_string())
            })?;

        info!(%url, status = %response.status(), "WebSocket connection established");

        Ok(Connection::new(stream))
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn timeout_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
