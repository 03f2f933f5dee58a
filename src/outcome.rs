//! Final verdict of a star request.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Reason reported when the server answers with the error marker.
pub const ERROR_RECEIVED: &str = "error received";

/// Reason reported when no reply arrives before the response timer fires.
pub const TIMEOUT_WAITING: &str = "timeout waiting for response";

/// Reason reported when the server closes cleanly without confirming.
pub const REQUEST_FAILED: &str = "request failed";

// ============================================================================
// Outcome
// ============================================================================

/// Terminal result of one request session.
///
/// Exactly one outcome is produced per run. The failure reason is free text
/// meant for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server confirmed the request.
    Success,
    /// The request did not succeed.
    Failure {
        /// Human-readable reason.
        reason: String,
    },
}

impl Outcome {
    /// Creates a failure outcome.
    #[inline]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`Outcome::Success`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the failure reason, if any.
    #[inline]
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    /// Process exit status for this outcome: 0 on success, 1 on failure.
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure { .. } => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Star request succeeded"),
            Self::Failure { reason } => f.write_str(reason),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
