//! Cancellable one-shot response timer.

// ============================================================================
// Imports
// ============================================================================

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Sleep, sleep};
use tracing::trace;

// ============================================================================
// TimerState
// ============================================================================

/// Lifecycle of a [`ResponseTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never armed.
    Idle,
    /// Running.
    Armed,
    /// Expired. Terminal.
    Fired,
    /// Cancelled before expiry. Terminal.
    Cancelled,
}

// ============================================================================
// ResponseTimer
// ============================================================================

/// One-shot timer bounding how long a session waits for a reply.
///
/// [`ResponseTimer::fired`] is cancel-safe, so it can sit in a
/// `tokio::select!` loop. Once cancelled or fired it never completes again.
#[derive(Debug)]
pub struct ResponseTimer {
    /// Pending deadline while armed.
    deadline: Option<Pin<Box<Sleep>>>,
    /// Current state.
    state: TimerState,
}

impl Default for ResponseTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseTimer {
    /// Creates an idle timer.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadline: None,
            state: TimerState::Idle,
        }
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Returns `true` while the timer is running.
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state == TimerState::Armed
    }

    /// Arms the timer. Re-arming an armed timer restarts it.
    pub fn arm(&mut self, duration: Duration) {
        self.deadline = Some(Box::pin(sleep(duration)));
        self.state = TimerState::Armed;
        trace!(?duration, "Response timer armed");
    }

    /// Cancels the timer synchronously. No-op unless armed.
    pub fn cancel(&mut self) {
        if self.is_armed() {
            self.deadline = None;
            self.state = TimerState::Cancelled;
            trace!("Response timer cancelled");
        }
    }

    /// Completes when the armed timer expires; pends forever otherwise.
    pub async fn fired(&mut self) {
        match self.deadline.as_mut() {
            Some(deadline) => {
                deadline.as_mut().await;
                self.deadline = None;
                self.state = TimerState::Fired;
                trace!("Response timer fired");
            }
            None => pending::<()>().await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::{Instant, advance, timeout};
    use tokio_test::task;
    use tokio_test::{assert_pending, assert_ready};

    fn assert_near(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_duration() {
        let mut timer = ResponseTimer::new();
        let start = Instant::now();
        timer.arm(Duration::from_secs(3));

        timer.fired().await;

        assert_eq!(timer.state(), TimerState::Fired);
        assert_near(start.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_idle_wait_is_pending() {
        let mut timer = ResponseTimer::new();
        let mut wait = task::spawn(timer.fired());
        assert_pending!(wait.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_pending_until_deadline() {
        let mut timer = ResponseTimer::new();
        timer.arm(Duration::from_secs(3));

        {
            let mut wait = task::spawn(timer.fired());
            assert_pending!(wait.poll());
        }
        assert!(timer.is_armed());

        advance(Duration::from_secs(3)).await;

        {
            let mut wait = task::spawn(timer.fired());
            assert_ready!(wait.poll());
        }
        assert_eq!(timer.state(), TimerState::Fired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_stays_pending() {
        let mut timer = ResponseTimer::new();
        timer.arm(Duration::from_millis(10));
        timer.cancel();

        advance(Duration::from_secs(1)).await;

        let mut wait = task::spawn(timer.fired());
        assert_pending!(wait.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let mut timer = ResponseTimer::new();
        timer.arm(Duration::from_millis(10));
        timer.cancel();

        assert_eq!(timer.state(), TimerState::Cancelled);
        assert!(
            timeout(Duration::from_secs(60), timer.fired())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_never_fires() {
        let mut timer = ResponseTimer::new();
        assert!(
            timeout(Duration::from_secs(60), timer.fired())
                .await
                .is_err()
        );
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_only_once() {
        let mut timer = ResponseTimer::new();
        timer.arm(Duration::from_millis(10));
        timer.fired().await;

        assert!(
            timeout(Duration::from_secs(60), timer.fired())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_noop() {
        let mut timer = ResponseTimer::new();
        timer.arm(Duration::from_millis(10));
        timer.fired().await;
        timer.cancel();

        assert_eq!(timer.state(), TimerState::Fired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_keeps_deadline() {
        let mut timer = ResponseTimer::new();
        let start = Instant::now();
        timer.arm(Duration::from_secs(3));

        // Abandon a wait halfway, as a select! loop would
        assert!(
            timeout(Duration::from_secs(1), timer.fired())
                .await
                .is_err()
        );
        assert!(timer.is_armed());

        timer.fired().await;
        assert_near(start.elapsed(), Duration::from_secs(3));
    }
}
