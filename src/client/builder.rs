//! Builder pattern for client configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use twinkle_client::Client;
//!
//! # fn example() -> twinkle_client::Result<()> {
//! let client = Client::builder()
//!     .url("ws://localhost:9000")
//!     .response_timeout(Duration::from_secs(3))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

use super::core::Client;
use super::options::{ClientOptions, DEFAULT_URL};

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`].
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    /// Endpoint, unparsed.
    url: Option<String>,
    /// Response timeout override.
    response_timeout: Option<Duration>,
    /// Connect timeout override.
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WebSocket endpoint (default `ws://localhost:9000`).
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets how long to wait for the confirmation (default 3s).
    #[inline]
    #[must_use]
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Sets the bound on the connection attempt (default 10s).
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the endpoint does not parse
    /// - [`Error::Config`] if the scheme is not `ws`/`wss` or a timeout is zero
    pub fn build(self) -> Result<Client> {
        let url = Self::validate_url(self.url.as_deref().unwrap_or(DEFAULT_URL))?;

        let mut options = ClientOptions::new(url);
        if let Some(timeout) = self.response_timeout {
            options.response_timeout = Self::validate_timeout("response", timeout)?;
        }
        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Self::validate_timeout("connect", timeout)?;
        }

        Ok(Client::new(options))
    }

    fn validate_url(raw: &str) -> Result<Url> {
        let url = Url::parse(raw)?;

        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(Error::config(format!(
                "unsupported URL scheme '{other}', expected ws or wss"
            ))),
        }
    }

    fn validate_timeout(name: &str, timeout: Duration) -> Result<Duration> {
        if timeout.is_zero() {
            return Err(Error::config(format!("{name} timeout must be non-zero")));
        }
        Ok(timeout)
    }
}

// ============================================================================
// Tests
// ============================================================================
