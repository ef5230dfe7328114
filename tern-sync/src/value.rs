use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::channel::{Channel, MessageChannel};
use crate::waiter::Waiter;

/// Single-slot, latest-value-wins channel. Writing the value already in the
/// slot coalesces: the status is left untouched and no waiter is notified.
pub struct ValueChannel<T> {
    state: Mutex<State<T>>,
    cv: Condvar,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SlotStatus {
    NoChange,
    Updated,
    Closed,
}

struct State<T> {
    value: Option<T>,
    status: SlotStatus,
}

impl<T: Clone + PartialEq> ValueChannel<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                value: None,
                status: SlotStatus::NoChange,
            }),
            cv: Condvar::new(),
        }
    }

    /// Replaces the slot value. Equal writes are coalesced silently.
    /// Returns false once closed.
    pub fn write(&self, value: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.status == SlotStatus::Closed {
            return false;
        }
        if state.value.as_ref() == Some(&value) {
            return true;
        }
        state.value = Some(value);
        state.status = SlotStatus::Updated;
        self.cv.notify_all();
        true
    }

    /// Drops any pending update without closing the channel.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        if state.status == SlotStatus::Updated {
            state.status = SlotStatus::NoChange;
        }
    }
}

impl<T: Clone + PartialEq> Default for ValueChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Waiter for ValueChannel<T> {
    fn wait_for(&self, timeout: Duration) -> bool {
        let state = self.state.lock().unwrap();
        let state = if state.status == SlotStatus::NoChange && !timeout.is_zero() {
            self.cv
                .wait_timeout_while(state, timeout, |s| s.status == SlotStatus::NoChange)
                .unwrap()
                .0
        } else {
            state
        };
        state.status != SlotStatus::NoChange
    }
}

impl<T: Clone + PartialEq + Send> Channel for ValueChannel<T> {
    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.status = SlotStatus::Closed;
        self.cv.notify_all();
    }

    fn is_closed(&self) -> bool {
        self.state.lock().unwrap().status == SlotStatus::Closed
    }
}

impl<T: Clone + PartialEq + Send> MessageChannel for ValueChannel<T> {
    type Item = T;

    fn read(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        if state.status != SlotStatus::Updated {
            return None;
        }
        state.status = SlotStatus::NoChange;
        state.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_value_wins() {
        let chan = ValueChannel::new();
        assert!(!chan.wait_for(Duration::from_millis(10)));

        assert!(chan.write("hello"));
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), Some("hello"));
        assert!(!chan.wait_for(Duration::from_millis(10)));

        assert!(chan.write("hello"));
        assert!(chan.write("world"));
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), Some("world"));
    }

    #[test]
    fn identical_writes_coalesce() {
        let chan = ValueChannel::new();
        chan.write(7);
        assert_eq!(chan.read(), Some(7));

        // Same value again: no update, no wakeup.
        assert!(chan.write(7));
        assert!(!chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), None);
    }

    #[test]
    fn closed_wakes_immediately() {
        let chan = ValueChannel::<i32>::new();
        chan.close();
        assert!(chan.wait_for(Duration::ZERO));
        assert!(chan.is_closed());
        assert!(!chan.write(1));
        assert_eq!(chan.read(), None);
    }
}
