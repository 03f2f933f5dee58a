//! Request/response state machine.
//!
//! The machine is pure: it consumes [`SessionEvent`]s one at a time and
//! answers with a [`Step`] telling the runner what to do. It never touches
//! the socket or the clock itself.
//!
//! # Transitions
//!
//! | Event | Condition | Step | Outcome |
//! |-------|-----------|------|---------|
//! | Error marker | awaiting | `Close` | `Failure("error received")` |
//! | Confirmation marker | awaiting | `Close` | `Success` |
//! | Unknown message | awaiting | `Ignore` | - |
//! | Timer fired | no response yet | `Close` | `Failure("timeout waiting for response")` |
//! | Timer fired | response received | `Ignore` | - |
//! | Abnormal close | awaiting | `Finished` | `Failure(transport reason)` |
//! | Clean close | no response yet | `Finished` | `Failure("request failed")` |
//! | Clean close | response received | `Finished` | `Success` |
//! | Anything | closed | `Ignore` | - |

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, trace};

use crate::outcome::{ERROR_RECEIVED, Outcome, REQUEST_FAILED, TIMEOUT_WAITING};
use crate::protocol::Reply;
use crate::transport::Inbound;

// ============================================================================
// Constants
// ============================================================================

/// Reason used for an abnormal closure that carried no text.
const ABNORMAL_CLOSURE: &str = "connection closed abnormally";

// ============================================================================
// SessionEvent
// ============================================================================

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Classified inbound text message.
    Message(Reply),
    /// The response timer expired.
    TimerFired,
    /// The connection closed without this session asking for it.
    ConnectionClosed {
        /// Whether the closing handshake completed.
        clean: bool,
        /// Close reason or transport error text.
        reason: String,
    },
}

impl From<Inbound> for SessionEvent {
    fn from(frame: Inbound) -> Self {
        match frame {
            Inbound::Text(text) => Self::Message(Reply::parse(&text)),
            Inbound::Closed { clean, reason } => Self::ConnectionClosed { clean, reason },
        }
    }
}

// ============================================================================
// Step
// ============================================================================

/// What the runner must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing; keep waiting.
    Ignore,
    /// Close the connection, then report the outcome.
    Close(Outcome),
    /// The connection is already closed; report the outcome.
    Finished(Outcome),
}

impl Step {
    /// Returns the outcome carried by a terminal step.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Ignore => None,
            Self::Close(outcome) | Self::Finished(outcome) => Some(outcome),
        }
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Lifecycle state of a session.
///
/// `Connecting` lives in the connector; a session starts awaiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Request sent, waiting for a reply, the timer or a closure.
    AwaitingResponse,
    /// Terminal. Holds the one outcome of the run.
    Closed(Outcome),
}

// ============================================================================
// RequestSession
// ============================================================================

/// Mutable state of the one outstanding request.
#[derive(Debug, Clone)]
pub struct RequestSession {
    /// Set when the confirmation marker arrives.
    response_received: bool,
    /// Current state.
    state: SessionState,
}

impl Default for RequestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSession {
    /// Creates a session for a freshly opened connection.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            response_received: false,
            state: SessionState::AwaitingResponse,
        }
    }

    /// Returns `true` once the confirmation marker has been seen.
    #[inline]
    #[must_use]
    pub const fn response_received(&self) -> bool {
        self.response_received
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the outcome once the session is closed.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            SessionState::AwaitingResponse => None,
            SessionState::Closed(outcome) => Some(outcome),
        }
    }

    /// Returns `true` once a terminal transition has been taken.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed(_))
    }

    /// Applies one event. The first terminal transition wins; every event
    /// after it is ignored.
    pub fn handle(&mut self, event: SessionEvent) -> Step {
        if self.is_closed() {
            trace!(?event, "Event after close ignored");
            return Step::Ignore;
        }

        match event {
            SessionEvent::Message(Reply::Error) => {
                debug!("Error marker received");
                Step::Close(self.finish(Outcome::failure(ERROR_RECEIVED)))
            }

            SessionEvent::Message(Reply::Confirmed) => {
                debug!("Confirmation received");
                self.response_received = true;
                Step::Close(self.finish(Outcome::Success))
            }

            SessionEvent::Message(Reply::Unknown) => {
                trace!("Unknown message ignored");
                Step::Ignore
            }

            SessionEvent::TimerFired if self.response_received => {
                trace!("Stale timer ignored");
                Step::Ignore
            }

            SessionEvent::TimerFired => {
                debug!("Timed out waiting for response");
                Step::Close(self.finish(Outcome::failure(TIMEOUT_WAITING)))
            }

            SessionEvent::ConnectionClosed {
                clean: false,
                reason,
            } => {
                debug!(reason = %reason, "Connection closed abnormally");
                let reason = if reason.is_empty() {
                    ABNORMAL_CLOSURE.to_owned()
                } else {
                    reason
                };
                Step::Finished(self.finish(Outcome::failure(reason)))
            }

            SessionEvent::ConnectionClosed { clean: true, .. } => {
                let outcome = if self.response_received {
                    Outcome::Success
                } else {
                    Outcome::failure(REQUEST_FAILED)
                };
                debug!(%outcome, "Connection closed cleanly");
                Step::Finished(self.finish(outcome))
            }
        }
    }

    /// Moves to `Closed` and returns a copy of the outcome for the runner.
    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.state = SessionState::Closed(outcome.clone());
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
