use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::channel::{Channel, MessageChannel};
use crate::waiter::Waiter;

/// Unbounded FIFO channel. Writers never block; readers wait until the
/// queue is non-empty or the channel closes.
pub struct QueueChannel<T> {
    state: Mutex<State<T>>,
    cv: Condvar,
}

struct State<T> {
    open: bool,
    queue: VecDeque<T>,
}

impl<T> QueueChannel<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                open: true,
                queue: VecDeque::new(),
            }),
            cv: Condvar::new(),
        }
    }

    /// Enqueues a value and wakes the waiters. Returns false once closed.
    pub fn write(&self, value: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return false;
        }
        state.queue.push_back(value);
        self.cv.notify_all();
        true
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().queue.clear();
    }
}

impl<T> Default for QueueChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Waiter for QueueChannel<T> {
    fn wait_for(&self, timeout: Duration) -> bool {
        let state = self.state.lock().unwrap();
        let state = if state.open && state.queue.is_empty() && !timeout.is_zero() {
            self.cv
                .wait_timeout_while(state, timeout, |s| s.open && s.queue.is_empty())
                .unwrap()
                .0
        } else {
            state
        };
        !state.open || !state.queue.is_empty()
    }
}

impl<T: Send> Channel for QueueChannel<T> {
    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = false;
        self.cv.notify_all();
    }

    fn is_closed(&self) -> bool {
        !self.state.lock().unwrap().open
    }
}

impl<T: Send> MessageChannel for QueueChannel<T> {
    type Item = T;

    fn read(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return None;
        }
        let value = state.queue.pop_front()?;
        if !state.queue.is_empty() {
            self.cv.notify_all();
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let chan = QueueChannel::new();
        assert!(!chan.wait_for(Duration::from_millis(10)));

        assert!(chan.write("hello"));
        assert!(chan.write("world"));
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), Some("hello"));
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), Some("world"));
        assert!(!chan.wait_for(Duration::from_millis(10)));
    }

    #[test]
    fn close_wakes_and_empties() {
        let chan = QueueChannel::<i32>::new();
        chan.write(1);
        chan.close();
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert!(chan.is_closed());
        assert_eq!(chan.read(), None);
        assert!(!chan.write(2));
    }

    #[test]
    fn cross_thread_handoff() {
        let chan = std::sync::Arc::new(QueueChannel::new());
        let writer = {
            let chan = chan.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    chan.write(i);
                }
            })
        };
        let mut seen = Vec::new();
        while seen.len() < 100 {
            if chan.wait_for(Duration::from_millis(50)) {
                while let Some(v) = chan.read() {
                    seen.push(v);
                }
            }
        }
        writer.join().unwrap();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }
}
