//! Drives one [`RequestSession`] over a [`MessageChannel`].
//!
//! Frames and the timer are multiplexed with `tokio::select!` inside a single
//! task, so events reach the state machine one at a time and in order.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::outcome::Outcome;
use crate::protocol::STAR_REQUEST;
use crate::transport::MessageChannel;

use super::machine::{RequestSession, SessionEvent, Step};
use super::timer::ResponseTimer;

// ============================================================================
// Constants
// ============================================================================

/// How long a session waits for the confirmation.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

// ============================================================================
// Runner
// ============================================================================

/// Sends the star request and runs the session to its single outcome.
///
/// The channel is closed on every terminal transition. When the peer closed
/// first, `close` only completes its side of the handshake.
pub async fn run_session<C>(channel: &mut C, response_timeout: Duration) -> Outcome
where
    C: MessageChannel + ?Sized,
{
    let mut session = RequestSession::new();
    let mut timer = ResponseTimer::new();

    if let Err(e) = channel.send_text(STAR_REQUEST).await {
        warn!(error = %e, "Failed to send star request");
        close_channel(channel).await;
        return Outcome::failure(e.to_string());
    }

    timer.arm(response_timeout);
    info!(timeout = ?response_timeout, "Star request sent");

    loop {
        let event = tokio::select! {
            biased;
            frame = channel.next_frame() => SessionEvent::from(frame),
            () = timer.fired() => SessionEvent::TimerFired,
        };

        match session.handle(event) {
            Step::Ignore => {}

            Step::Close(outcome) => {
                timer.cancel();
                close_channel(channel).await;
                debug!(%outcome, "Session closed by client");
                return outcome;
            }

            Step::Finished(outcome) => {
                timer.cancel();
                close_channel(channel).await;
                debug!(%outcome, "Session closed by peer");
                return outcome;
            }
        }
    }
}

/// Closes the channel. Errors are logged; the outcome is already decided.
async fn close_channel<C>(channel: &mut C)
where
    C: MessageChannel + ?Sized,
{
    if let Err(e) = channel.close().await {
        warn!(error = %e, "Failed to close connection");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;
    use tokio::time::{Instant, sleep};

    use crate::error::{Error, Result};
    use crate::transport::Inbound;

    /// What the session did to the channel.
    #[derive(Debug, Default)]
    struct Log {
        sent: Vec<String>,
        closes: usize,
    }

    /// In-memory channel fed by the test through an mpsc sender.
    struct ScriptedChannel {
        inbound: mpsc::UnboundedReceiver<Inbound>,
        log: Arc<Mutex<Log>>,
        fail_send: bool,
    }

    #[async_trait]
    impl MessageChannel for ScriptedChannel {
        async fn send_text(&mut self, text: &str) -> Result<()> {
            if self.fail_send {
                return Err(Error::ConnectionClosed);
            }
            self.log.lock().sent.push(text.to_owned());
            Ok(())
        }

        async fn next_frame(&mut self) -> Inbound {
            self.inbound
                .recv()
                .await
                .unwrap_or_else(|| Inbound::abnormal("script ended"))
        }

        async fn close(&mut self) -> Result<()> {
            self.log.lock().closes += 1;
            Ok(())
        }
    }

    fn scripted() -> (
        ScriptedChannel,
        mpsc::UnboundedSender<Inbound>,
        Arc<Mutex<Log>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let log = Arc::new(Mutex::new(Log::default()));
        let channel = ScriptedChannel {
            inbound: rx,
            log: Arc::clone(&log),
            fail_send: false,
        };
        (channel, tx, log)
    }

    /// Delivers `frame` after `delay` of (paused) time.
    fn deliver_after(tx: &mpsc::UnboundedSender<Inbound>, delay: Duration, frame: Inbound) {
        let tx = tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(frame);
        });
    }

    #[test]
    fn test_response_timeout_constant() {
        assert_eq!(RESPONSE_TIMEOUT.as_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_succeeds() {
        let (mut channel, tx, log) = scripted();
        deliver_after(
            &tx,
            Duration::from_millis(100),
            Inbound::Text("twinkle:starred".into()),
        );

        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::Success);
        let log = log.lock();
        assert_eq!(log.sent, vec!["twinkle:star".to_owned()]);
        assert_eq!(log.closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_marker_fails_before_timeout() {
        let (mut channel, tx, log) = scripted();
        deliver_after(
            &tx,
            Duration::from_millis(100),
            Inbound::Text("twinkle:error".into()),
        );

        let start = Instant::now();
        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::failure("error received"));
        assert!(start.elapsed() < RESPONSE_TIMEOUT);
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_times_out() {
        let (mut channel, _tx, log) = scripted();

        let start = Instant::now();
        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::failure("timeout waiting for response"));
        assert!(start.elapsed() >= RESPONSE_TIMEOUT);
        assert!(start.elapsed() < RESPONSE_TIMEOUT + Duration::from_millis(10));
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_messages_are_ignored() {
        let (mut channel, tx, _log) = scripted();
        tx.send(Inbound::Text("hello".into())).expect("send");
        tx.send(Inbound::Text("twinkle:star".into())).expect("send");
        deliver_after(
            &tx,
            Duration::from_secs(1),
            Inbound::Text("twinkle:starred".into()),
        );

        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_after_timeout_is_ignored() {
        let (mut channel, tx, log) = scripted();
        deliver_after(
            &tx,
            Duration::from_secs(4),
            Inbound::Text("twinkle:starred".into()),
        );

        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::failure("timeout waiting for response"));
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abnormal_close_reports_transport_reason() {
        let (mut channel, tx, log) = scripted();
        deliver_after(
            &tx,
            Duration::from_millis(50),
            Inbound::abnormal("Connection reset without closing handshake"),
        );

        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(
            outcome,
            Outcome::failure("Connection reset without closing handshake")
        );
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clean_close_without_confirmation_fails() {
        let (mut channel, tx, log) = scripted();
        tx.send(Inbound::clean("going away")).expect("send");

        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::failure("request failed"));
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_close_wins_over_expired_timer() {
        let (mut channel, tx, log) = scripted();
        tx.send(Inbound::clean("going away")).expect("send");

        let outcome = run_session(&mut channel, Duration::ZERO).await;

        assert_eq!(outcome, Outcome::failure("request failed"));
        assert_eq!(log.lock().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_never_waits() {
        let (mut channel, _tx, log) = scripted();
        channel.fail_send = true;

        let start = Instant::now();
        let outcome = run_session(&mut channel, RESPONSE_TIMEOUT).await;

        assert_eq!(outcome, Outcome::failure("Connection closed"));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(log.lock().sent.is_empty());
        assert_eq!(log.lock().closes, 1);
    }
}
