use std::sync::Mutex;
use std::time::Duration;

use crate::channel::{Channel, MessageChannel};
use crate::waiter::Waiter;

/// Synchronous channel that produces a value on demand by invoking a
/// user-supplied thunk. Closing drops the thunk; subsequent reads return
/// `None`.
pub struct GeneratorChannel<T> {
    thunk: Mutex<Option<Box<dyn FnMut() -> T + Send>>>,
}

impl<T> GeneratorChannel<T> {
    pub fn new(thunk: impl FnMut() -> T + Send + 'static) -> Self {
        Self {
            thunk: Mutex::new(Some(Box::new(thunk))),
        }
    }
}

impl<T> Waiter for GeneratorChannel<T> {
    fn wait_for(&self, _timeout: Duration) -> bool {
        true
    }
}

impl<T: Send> Channel for GeneratorChannel<T> {
    fn close(&self) {
        *self.thunk.lock().unwrap() = None;
    }

    fn is_closed(&self) -> bool {
        self.thunk.lock().unwrap().is_none()
    }

    fn is_synchronous(&self) -> bool {
        true
    }
}

impl<T: Send> MessageChannel for GeneratorChannel<T> {
    type Item = T;

    fn read(&self) -> Option<T> {
        self.thunk.lock().unwrap().as_mut().map(|f| f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_invoke_the_thunk() {
        let mut i = 0;
        let chan = GeneratorChannel::new(move || {
            i += 1;
            i
        });

        assert!(chan.wait_for(Duration::from_millis(10)));
        assert_eq!(chan.read(), Some(1));
        assert!(chan.poll());
        assert_eq!(chan.read(), Some(2));
        assert_eq!(chan.read(), Some(3));

        chan.close();
        assert!(chan.wait_for(Duration::from_millis(10)));
        assert!(chan.is_closed());
        assert_eq!(chan.read(), None);
    }
}
