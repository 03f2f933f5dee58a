//! Core client implementation.

// ============================================================================
// Imports
// ============================================================================

use tracing::{info, warn};

use crate::notify::Notifier;
use crate::outcome::Outcome;
use crate::session::run_session;
use crate::transport::Connector;

use super::builder::ClientBuilder;
use super::options::ClientOptions;

// ============================================================================
// Client
// ============================================================================

/// One-shot star request client.
///
/// Each call to [`Client::request`] makes exactly one connection attempt and
/// yields exactly one [`Outcome`]. There is no retry.
#[derive(Debug, Clone)]
pub struct Client {
    /// Validated settings.
    options: ClientOptions,
}

impl Client {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    /// Returns the client settings.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Connects, sends the star request and waits for the verdict.
    ///
    /// A failed connection attempt yields a failure immediately; the
    /// response timer is only armed once the connection is open.
    pub async fn request(&self) -> Outcome {
        let connector = Connector::new(self.options.connect_timeout);

        let mut connection = match connector.connect(&self.options.url).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(url = %self.options.url, error = %e, "Could not connect");
                return Outcome::failure(e.to_string());
            }
        };

        let outcome = run_session(&mut connection, self.options.response_timeout).await;
        info!(url = %self.options.url, success = outcome.is_success(), "Request finished");
        outcome
    }

    /// Runs [`Client::request`] and hands the outcome to `notifier`.
    pub async fn run<N>(&self, notifier: &N) -> Outcome
    where
        N: Notifier + ?Sized,
    {
        let outcome = self.request().await;
        notifier.notify(&outcome).await;
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Client;

    #[test]
    fn test_builder_returns_client_builder() {
        let _builder = Client::builder();
    }

    #[test]
    fn test_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Client>();
    }

    #[test]
    fn test_client_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Client>();
    }
}
