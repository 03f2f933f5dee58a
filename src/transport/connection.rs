//! WebSocket connection used by a single request session.
//!
//! [`MessageChannel`] is the seam between the session state machine and the
//! socket. [`Connection`] implements it over a `tokio-tungstenite` stream.
//!
//! # Frame Mapping
//!
//! | WebSocket | [`Inbound`] |
//! |-----------|-------------|
//! | Text | `Text` |
//! | Close frame | `Closed { clean: true }` |
//! | Socket error | `Closed { clean: false }` with the error text |
//! | End of stream without close frame | `Closed { clean: false }` |
//! | Binary, Ping, Pong | skipped |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// How long [`Connection::close`] waits for the peer's close reply.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Reason used when the stream ends without a close frame.
const CONNECTION_LOST: &str = "connection lost";

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Inbound
// ============================================================================

/// Frame delivered to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Text message from the server.
    Text(String),
    /// The connection is gone.
    Closed {
        /// `true` when the closing handshake happened, `false` on a
        /// transport-level failure.
        clean: bool,
        /// Close reason or transport error text.
        reason: String,
    },
}

impl Inbound {
    /// Creates an abnormal closure with the given reason.
    #[inline]
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self::Closed {
            clean: false,
            reason: reason.into(),
        }
    }

    /// Creates a clean closure with the given reason.
    #[inline]
    pub fn clean(reason: impl Into<String>) -> Self {
        Self::Closed {
            clean: true,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// MessageChannel
// ============================================================================

/// Bidirectional text message channel owned by one session.
#[async_trait]
pub trait MessageChannel: Send {
    /// Sends a text message.
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Waits for the next frame the session cares about.
    ///
    /// Never fails: transport errors are reported as [`Inbound::Closed`].
    async fn next_frame(&mut self) -> Inbound;

    /// Starts the closing handshake and waits briefly for it to finish.
    ///
    /// When the peer closed first, this only flushes the close reply.
    async fn close(&mut self) -> Result<()>;
}

// ============================================================================
// Connection
// ============================================================================

/// Open WebSocket connection to the twinkle server.
pub struct Connection {
    /// Underlying stream.
    stream: WsStream,
    /// Set once either side has closed.
    closed: bool,
    /// Peer closed first; its close reply is queued but not yet flushed.
    close_reply_pending: bool,
}

impl Connection {
    /// Wraps an established WebSocket stream.
    pub(crate) fn new(stream: WsStream) -> Self {
        Self {
            stream,
            closed: false,
            close_reply_pending: false,
        }
    }

    /// Returns `true` once the connection has been closed.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl MessageChannel for Connection {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }

        self.stream
            .send(Message::Text(text.to_owned().into()))
            .await?;

        trace!(text, "Message sent");
        Ok(())
    }

    async fn next_frame(&mut self) -> Inbound {
        if self.closed {
            return Inbound::clean("connection closed");
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    trace!(text = text.as_str(), "Message received");
                    return Inbound::Text(text.as_str().to_owned());
                }

                // No await past this point: a dropped future must not lose
                // the close. The reply is flushed by `close()`.
                Some(Ok(Message::Close(frame))) => {
                    self.closed = true;
                    self.close_reply_pending = true;
                    let reason = frame
                        .map(|f| f.reason.as_str().to_owned())
                        .unwrap_or_default();
                    debug!(reason = %reason, "WebSocket closed by remote");
                    return Inbound::clean(reason);
                }

                Some(Err(e)) => {
                    self.closed = true;
                    warn!(error = %e, "WebSocket error");
                    return Inbound::abnormal(e.to_string());
                }

                None => {
                    self.closed = true;
                    debug!("WebSocket stream ended");
                    return Inbound::abnormal(CONNECTION_LOST);
                }

                // Ignore Binary, Ping, Pong, Frame
                Some(Ok(other)) => {
                    trace!(len = other.len(), "Ignoring non-text frame");
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            if std::mem::take(&mut self.close_reply_pending)
                && let Err(e) = self.stream.flush().await
            {
                trace!(error = %e, "Close reply not flushed");
            }
            return Ok(());
        }
        self.closed = true;

        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {}
            Err(e) => return Err(e.into()),
        }

        // Wait for the peer to answer the close frame
        let stream = &mut self.stream;
        let drain = async move { while let Some(Ok(_)) = stream.next().await {} };

        if timeout(CLOSE_GRACE, drain).await.is_err() {
            debug!(grace = ?CLOSE_GRACE, "Peer did not finish closing handshake");
        }

        debug!("WebSocket closed by client");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
