use crate::waiter::Waiter;

/// Default block size for stream reads.
pub const DEFAULT_BLOCK_SIZE: usize = 65_536;

/// A waiter with a close switch.
///
/// Closing is monotonic: once closed a channel stays closed, all waits
/// return immediately and all reads come back empty. A channel belongs to
/// at most one [`Dispatch`](crate::Dispatch) at a time.
pub trait Channel: Waiter + Send + Sync {
    /// Closes the channel and wakes every waiter. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;

    /// Synchronous channels can be polled in zero time and are swept by the
    /// dispatch thread; asynchronous ones may block indefinitely and get a
    /// dedicated worker.
    fn is_synchronous(&self) -> bool {
        false
    }
}

/// A channel delivering discrete values.
pub trait MessageChannel: Channel {
    type Item;

    /// Takes the next value if one is available. `None` means empty or
    /// closed; check [`is_closed`](Channel::is_closed) to tell them apart.
    fn read(&self) -> Option<Self::Item>;
}

/// A channel delivering an unbounded byte stream.
pub trait StreamChannel: Channel {
    /// Reads up to `buf.len()` bytes, returning the count.
    fn read(&self, buf: &mut [u8]) -> usize;

    fn block_size(&self) -> usize;

    /// Changes the per-read block size used by [`append`](Self::append).
    fn set_block_size(&self, n: usize);

    /// Reads up to one block onto the end of `dst`, returning the count.
    fn append(&self, dst: &mut Vec<u8>) -> usize {
        let ofs = dst.len();
        dst.resize(ofs + self.block_size(), 0);
        let n = StreamChannel::read(self, &mut dst[ofs..]);
        dst.truncate(ofs + n);
        n
    }

    /// Accumulates the whole stream until the channel closes.
    fn read_all(&self) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            self.wait();
            if self.is_closed() {
                break;
            }
            self.append(&mut out);
        }
        out
    }
}
