//! Twinkle client - one-shot star request over WebSocket.
//!
//! Connects to a twinkle server, sends a single star request, waits a
//! bounded time for the confirmation, and reports the verdict.
//!
//! # Architecture
//!
//! ```text
//! Connector ──► RequestSession ──► Outcome ──► Notifier
//!  (connect)     (send, wait,       (one per     (print, sound,
//!                 time out)          run)          exit code)
//! ```
//!
//! Key design principles:
//!
//! - Exactly one connection attempt and one outcome per run
//! - The first terminal transition wins; later events are no-ops
//! - Events are handled one at a time in a single task
//! - Sound playback is best effort and never changes the outcome
//!
//! # Quick Start
//!
//! ```no_run
//! use twinkle_client::{Client, CommandPlayer, ConsoleNotifier, NotifierConfig, Result};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let client = Client::builder().url("ws://localhost:9000").build()?;
//!     let notifier = ConsoleNotifier::new(NotifierConfig::default(), CommandPlayer::current());
//!
//!     let outcome = client.run(&notifier).await;
//!     std::process::exit(i32::from(outcome.exit_code()));
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`] and its builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`notify`] | Outcome notification and sounds |
//! | [`outcome`] | The [`Outcome`] of a run |
//! | [`protocol`] | Wire markers |
//! | [`session`] | Request/response state machine |
//! | [`transport`] | WebSocket connector and connection |

// ============================================================================
// Modules
// ============================================================================

/// Client entry point.
pub mod client;

/// Error types and result aliases.
pub mod error;

/// Outcome notification: console output and sounds.
pub mod notify;

/// Final verdict of a run.
pub mod outcome;

/// Wire protocol markers.
pub mod protocol;

/// Request/response state machine and its async driver.
pub mod session;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder, ClientOptions};

// Error types
pub use error::{Error, Result};

// Notification types
pub use notify::{CommandPlayer, ConsoleNotifier, Notifier, NotifierConfig, Sound, SoundPlayer};

// Outcome
pub use outcome::Outcome;
