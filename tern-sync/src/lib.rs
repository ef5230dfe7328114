//! Waitable channels and a cooperative dispatch controller.
//!
//! Every blocking primitive in this crate composes on a single timed-wait
//! contract, [`Waiter`]. A [`Channel`] is a waiter with a close switch and a
//! kind-specific read operation; [`Dispatch`] multiplexes many channels onto
//! user callbacks, polling synchronous channels from its own thread and
//! driving asynchronous ones from one worker thread each.

pub mod buffer;
pub mod channel;
pub mod dispatch;
pub mod generator;
pub mod queue;
#[cfg(unix)]
pub mod signal;
pub mod timer;
pub mod value;
pub mod waiter;

pub use buffer::BufferChannel;
pub use channel::{Channel, MessageChannel, StreamChannel, DEFAULT_BLOCK_SIZE};
pub use dispatch::{CallbackError, ChannelId, Dispatch, Fault};
pub use generator::GeneratorChannel;
pub use queue::QueueChannel;
#[cfg(unix)]
pub use signal::{signal_name, SignalChannel, SignalError};
pub use timer::TimerChannel;
pub use value::ValueChannel;
pub use waiter::Waiter;
