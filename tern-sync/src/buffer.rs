use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::channel::{Channel, StreamChannel, DEFAULT_BLOCK_SIZE};
use crate::waiter::Waiter;

/// Unbounded byte buffer with a self-compacting read offset: reads advance
/// the offset and the consumed prefix is erased once it reaches half the
/// buffer, keeping the cost amortised O(1) per byte.
pub struct BufferChannel {
    state: Mutex<State>,
    cv: Condvar,
    block: AtomicUsize,
}

struct State {
    buf: Vec<u8>,
    ofs: usize,
    open: bool,
}

impl State {
    fn readable(&self) -> bool {
        self.ofs < self.buf.len()
    }
}

impl BufferChannel {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                buf: Vec::new(),
                ofs: 0,
                open: true,
            }),
            cv: Condvar::new(),
            block: AtomicUsize::new(DEFAULT_BLOCK_SIZE),
        }
    }

    /// Appends bytes, waking waiters if readable data exists. Returns false
    /// once closed.
    pub fn write(&self, src: &[u8]) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return false;
        }
        state.buf.extend_from_slice(src);
        if state.readable() {
            self.cv.notify_all();
        }
        true
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.buf.clear();
        state.ofs = 0;
    }
}

impl Default for BufferChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Waiter for BufferChannel {
    fn wait_for(&self, timeout: Duration) -> bool {
        let state = self.state.lock().unwrap();
        let state = if state.open && !state.readable() && !timeout.is_zero() {
            self.cv
                .wait_timeout_while(state, timeout, |s| s.open && !s.readable())
                .unwrap()
                .0
        } else {
            state
        };
        !state.open || state.readable()
    }
}

impl Channel for BufferChannel {
    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.buf.clear();
        state.ofs = 0;
        state.open = false;
        self.cv.notify_all();
    }

    fn is_closed(&self) -> bool {
        !self.state.lock().unwrap().open
    }
}

impl StreamChannel for BufferChannel {
    fn read(&self, dst: &mut [u8]) -> usize {
        if dst.is_empty() {
            return 0;
        }
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return 0;
        }
        let n = (state.buf.len() - state.ofs).min(dst.len());
        let ofs = state.ofs;
        dst[..n].copy_from_slice(&state.buf[ofs..ofs + n]);
        state.ofs += n;
        let (ofs, len) = (state.ofs, state.buf.len());
        if ofs == len {
            state.buf.clear();
            state.ofs = 0;
        } else if 2 * ofs >= len {
            state.buf.drain(..ofs);
            state.ofs = 0;
        }
        n
    }

    fn block_size(&self) -> usize {
        self.block.load(Ordering::Relaxed)
    }

    fn set_block_size(&self, n: usize) {
        self.block.store(n.max(1), Ordering::Relaxed);
    }
}
