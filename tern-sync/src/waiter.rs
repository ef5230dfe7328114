use std::time::{Duration, Instant};

/// Timed-wait contract shared by every blocking primitive.
///
/// Implementors supply [`wait_for`](Waiter::wait_for); the other operations
/// are derived from it. A zero timeout is a poll. A `true` result is
/// advisory readiness: spurious wakeups are permitted and callers re-check
/// the underlying state.
pub trait Waiter {
    /// Blocks for up to `timeout`, returning readiness.
    fn wait_for(&self, timeout: Duration) -> bool;

    /// Non-blocking readiness check.
    fn poll(&self) -> bool {
        self.wait_for(Duration::ZERO)
    }

    /// Blocks until ready, waking once a second so cancellation can
    /// propagate.
    fn wait(&self) {
        while !self.wait_for(Duration::from_secs(1)) {}
    }

    /// Blocks until ready or the deadline passes; past deadlines poll.
    fn wait_until(&self, deadline: Instant) -> bool {
        self.wait_for(deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ReadyAfter {
        polls: AtomicUsize,
        threshold: usize,
    }

    impl Waiter for ReadyAfter {
        fn wait_for(&self, _timeout: Duration) -> bool {
            self.polls.fetch_add(1, Ordering::SeqCst) + 1 >= self.threshold
        }
    }

    #[test]
    fn derived_operations_delegate() {
        let w = ReadyAfter {
            polls: AtomicUsize::new(0),
            threshold: 3,
        };
        assert!(!w.poll());
        assert!(!w.poll());
        assert!(w.poll());
        w.wait();
        assert!(w.wait_until(Instant::now()));
    }
}
