//! Bounded poll-until-success.
//!
//! Some challenges can only be won by resubmitting the same attempt every
//! block until a chain condition lines up. The loop here is bounded and the
//! delay is injectable so it can be tested without wall-clock sleeps.

use eyre::{eyre, Result};
use std::{future::Future, time::Duration};
use tracing::{debug, warn};

/// Polling knobs, threaded through [`crate::Ctx`].
#[derive(Clone, Copy, Debug)]
pub struct PollOptions {
    /// Maximum number of attempts before giving up.
    pub attempts: usize,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self { attempts: 600, delay: Duration::from_secs(10) }
    }
}

/// Suspends between poll attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real sleeper backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs `attempt` until it reports completion, sleeping between tries.
///
/// An attempt resolving to `Ok(true)` ends the loop; `Ok(false)` and errors
/// (a reverted guess is expected most blocks) are logged and retried.
/// Exhausting the attempt budget is an error.
pub async fn poll_until<S, F, Fut>(opts: PollOptions, sleeper: &S, mut attempt: F) -> Result<()>
where
    S: Sleeper,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt_no in 1..=opts.attempts {
        match attempt().await {
            Ok(true) => return Ok(()),
            Ok(false) => debug!(attempt_no, "not complete yet"),
            Err(err) => warn!(attempt_no, %err, "attempt failed"),
        }
        if attempt_no < opts.attempts {
            sleeper.sleep(opts.delay).await;
        }
    }
    Err(eyre!("condition not met after {} attempts", opts.attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::bail;
    use std::cell::Cell;

    /// Records sleeps instead of performing them.
    #[derive(Default)]
    struct NoopSleeper {
        slept: Cell<usize>,
    }

    impl Sleeper for NoopSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.slept.set(self.slept.get() + 1);
        }
    }

    fn opts(attempts: usize) -> PollOptions {
        PollOptions { attempts, delay: Duration::from_secs(10) }
    }

    #[tokio::test]
    async fn succeeds_on_nth_attempt_without_wall_clock() {
        let sleeper = NoopSleeper::default();
        let calls = Cell::new(0usize);
        poll_until(opts(5), &sleeper, || {
            calls.set(calls.get() + 1);
            let done = calls.get() == 3;
            async move { Ok(done) }
        })
        .await
        .unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.slept.get(), 2);
    }

    #[tokio::test]
    async fn swallows_attempt_errors() {
        let sleeper = NoopSleeper::default();
        let calls = Cell::new(0usize);
        poll_until(opts(5), &sleeper, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 2 {
                    bail!("revert: answer does not match");
                }
                Ok(true)
            }
        })
        .await
        .unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn errors_after_exhausting_attempts() {
        let sleeper = NoopSleeper::default();
        let err = poll_until(opts(3), &sleeper, || async { Ok(false) }).await.unwrap_err();
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(sleeper.slept.get(), 2);
    }
}
