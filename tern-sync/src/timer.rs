use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::channel::Channel;
use crate::waiter::Waiter;

/// Periodic tick source. Each successful wait consumes one tick; a finite
/// tick budget closes the channel when it runs out.
pub struct TimerChannel {
    interval: Duration,
    synchronous: bool,
    state: Mutex<State>,
    cv: Condvar,
}

struct State {
    next_tick: Instant,
    remaining: usize,
    open: bool,
}

impl TimerChannel {
    /// Unbounded timer. Zero intervals are clamped to one nanosecond so the
    /// tick arithmetic stays finite.
    pub fn new(interval: Duration) -> Self {
        Self::with_count(interval, usize::MAX)
    }

    /// Timer that closes itself after `count` ticks.
    pub fn with_count(interval: Duration, count: usize) -> Self {
        let interval = interval.max(Duration::from_nanos(1));
        Self {
            interval,
            synchronous: false,
            state: Mutex::new(State {
                next_tick: Instant::now() + interval,
                remaining: count,
                open: true,
            }),
            cv: Condvar::new(),
        }
    }

    /// Marks the timer as pollable from the dispatch sweep instead of a
    /// dedicated worker.
    pub fn synchronous(mut self) -> Self {
        self.synchronous = true;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next(&self) -> Instant {
        self.state.lock().unwrap().next_tick
    }

    /// Fast-forwards past now, consuming every elapsed tick at once.
    pub fn flush(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return;
        }
        let now = Instant::now();
        if now < state.next_tick {
            return;
        }
        let elapsed = now - state.next_tick;
        let skip = (elapsed.as_nanos() / self.interval.as_nanos()) as usize + 1;
        self.step(&mut state, skip);
    }

    fn step(&self, state: &mut State, n: usize) {
        let n = n.min(state.remaining);
        state.remaining -= n;
        let advance = self.interval.saturating_mul(n.min(u32::MAX as usize) as u32);
        state.next_tick += advance;
        if state.remaining == 0 {
            state.open = false;
            self.cv.notify_all();
        }
    }
}

impl Waiter for TimerChannel {
    fn wait_for(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return true;
        }
        let now = Instant::now();
        if state.next_tick <= now {
            self.step(&mut state, 1);
            return true;
        }
        if timeout.is_zero() {
            return false;
        }
        let remaining = state.next_tick - now;
        if timeout < remaining {
            let (state, _) = self
                .cv
                .wait_timeout_while(state, timeout, |s| s.open)
                .unwrap();
            return !state.open;
        }
        let (mut state, _) = self
            .cv
            .wait_timeout_while(state, remaining, |s| s.open)
            .unwrap();
        if state.open {
            self.step(&mut state, 1);
        }
        true
    }
}

impl Channel for TimerChannel {
    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = false;
        self.cv.notify_all();
    }

    fn is_closed(&self) -> bool {
        !self.state.lock().unwrap().open
    }

    fn is_synchronous(&self) -> bool {
        self.synchronous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_arrive_on_schedule() {
        let chan = TimerChannel::new(Duration::from_millis(25));
        assert!(!chan.wait_for(Duration::from_millis(1)));
        assert!(chan.wait_for(Duration::from_millis(100)));

        std::thread::sleep(Duration::from_millis(150));
        assert!(chan.wait_for(Duration::from_millis(1)));
        assert!(chan.wait_for(Duration::from_millis(1)));

        chan.close();
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert!(chan.is_closed());
    }

    #[test]
    fn finite_count_closes() {
        let chan = TimerChannel::with_count(Duration::from_millis(25), 1);
        assert!(!chan.wait_for(Duration::from_millis(1)));
        assert!(chan.wait_for(Duration::from_millis(100)));
        assert!(chan.is_closed());
    }

    #[test]
    fn flush_consumes_elapsed_ticks() {
        let chan = TimerChannel::new(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(40));
        chan.flush();
        assert!(chan.next() > Instant::now() - Duration::from_millis(5));
        assert!(!chan.is_closed());
    }
}
