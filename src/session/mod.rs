//! Request/response session.
//!
//! One session owns one connection for the lifetime of one star request:
//!
//! ```text
//! Connecting ──► AwaitingResponse ──► Closed(Outcome)
//!  (connector)     request sent,
//!                  timer armed
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | `machine` | Pure state machine |
//! | `timer` | Cancellable response timer |
//! | `runner` | Async driver tying channel, timer and machine together |

// ============================================================================
// Submodules
// ============================================================================

/// Pure state machine.
pub mod machine;

/// Async driver.
pub mod runner;

/// Cancellable response timer.
pub mod timer;

// ============================================================================
// Re-exports
// ============================================================================

pub use machine::{RequestSession, SessionEvent, SessionState, Step};
pub use runner::{RESPONSE_TIMEOUT, run_session};
pub use timer::{ResponseTimer, TimerState};
