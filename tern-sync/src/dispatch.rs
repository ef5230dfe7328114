use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{trace, warn};

use crate::channel::{Channel, MessageChannel, StreamChannel};
use crate::waiter::Waiter;

/// Error type carried by callbacks and surfaced through [`Fault::Error`].
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Identity of an attached channel, stable for the lifetime of the
/// underlying allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(usize);

impl ChannelId {
    pub fn of<C: Channel + ?Sized>(channel: &Arc<C>) -> Self {
        ChannelId(Arc::as_ptr(channel).cast::<()>() as usize)
    }
}

/// What [`Dispatch::run`] came back with.
#[derive(Debug)]
pub enum Fault {
    /// No channels remain in the dispatch set.
    Empty,
    /// A channel closed cleanly.
    Closed { channel: ChannelId },
    /// A callback (or the read feeding it) failed.
    Error {
        channel: ChannelId,
        error: CallbackError,
    },
}

impl Fault {
    pub fn is_empty(&self) -> bool {
        matches!(self, Fault::Empty)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Fault::Closed { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Fault::Error { .. })
    }

    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            Fault::Empty => None,
            Fault::Closed { channel } | Fault::Error { channel, .. } => Some(*channel),
        }
    }
}

type Handler = Box<dyn FnMut() -> Result<bool, CallbackError> + Send>;

struct Task {
    id: ChannelId,
    channel: Arc<dyn Channel>,
    // Synchronous channels keep their handler here; asynchronous ones move
    // it into the worker thread.
    handler: Option<Handler>,
    worker: Option<JoinHandle<()>>,
}

/// Runs callbacks for many heterogeneous channels until one of them closes
/// or fails.
///
/// Synchronous channels are polled in insertion order from the caller's
/// thread inside [`run`](Dispatch::run); each asynchronous channel gets
/// exactly one worker thread, spawned at attach time and joined when the
/// channel leaves the dispatch set. Dropping the dispatch stops everything.
pub struct Dispatch {
    tasks: Vec<Task>,
    faults: Arc<Mutex<VecDeque<Fault>>>,
}

fn record_fault(
    faults: &Mutex<VecDeque<Fault>>,
    channel: &dyn Channel,
    id: ChannelId,
    error: Option<CallbackError>,
) {
    let fault = match error {
        None => Fault::Closed { channel: id },
        Some(error) => {
            warn!(channel = id.0, %error, "channel callback fault");
            Fault::Error { channel: id, error }
        }
    };
    faults.lock().unwrap().push_back(fault);
    channel.close();
}

impl Dispatch {
    const MIN_INTERVAL: Duration = Duration::from_micros(1);
    const MAX_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            faults: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Attaches a message channel; `callback` runs once per value read.
    ///
    /// Panics if the channel is already attached.
    pub fn add_message<C, F>(&mut self, channel: Arc<C>, mut callback: F)
    where
        C: MessageChannel + 'static,
        C::Item: Send,
        F: FnMut(C::Item) -> Result<(), CallbackError> + Send + 'static,
    {
        let reader = channel.clone();
        self.attach(
            channel,
            Box::new(move || match reader.read() {
                Some(value) => {
                    callback(value)?;
                    Ok(true)
                }
                None => Ok(false),
            }),
        );
    }

    /// Attaches a tick source; `callback` runs once per readiness.
    ///
    /// Panics if the channel is already attached.
    pub fn add_ready<C, F>(&mut self, channel: Arc<C>, mut callback: F)
    where
        C: Channel + 'static,
        F: FnMut() -> Result<(), CallbackError> + Send + 'static,
    {
        self.attach(
            channel,
            Box::new(move || {
                callback()?;
                Ok(true)
            }),
        );
    }

    /// Attaches a stream channel; `callback` sees the accumulated bytes and
    /// may consume or retain them between calls.
    ///
    /// Panics if the channel is already attached.
    pub fn add_stream<C, F>(&mut self, channel: Arc<C>, mut callback: F)
    where
        C: StreamChannel + 'static,
        F: FnMut(&mut Vec<u8>) -> Result<(), CallbackError> + Send + 'static,
    {
        let reader = channel.clone();
        let mut accum = Vec::new();
        self.attach(
            channel,
            Box::new(move || {
                if reader.append(&mut accum) > 0 {
                    callback(&mut accum)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }),
        );
    }

    fn attach<C: Channel + 'static>(&mut self, channel: Arc<C>, mut handler: Handler) {
        let id = ChannelId::of(&channel);
        assert!(
            self.tasks.iter().all(|t| t.id != id),
            "duplicate channel in dispatch set"
        );

        if channel.is_synchronous() {
            self.tasks.push(Task {
                id,
                channel,
                handler: Some(handler),
                worker: None,
            });
            return;
        }

        let faults = self.faults.clone();
        let worker_channel = channel.clone();
        let worker = thread::spawn(move || {
            trace!(channel = id.0, "dispatch worker started");
            loop {
                worker_channel.wait();
                if worker_channel.is_closed() {
                    record_fault(&faults, &*worker_channel, id, None);
                    break;
                }
                if let Err(error) = handler() {
                    record_fault(&faults, &*worker_channel, id, Some(error));
                    break;
                }
            }
            trace!(channel = id.0, "dispatch worker finished");
        });

        self.tasks.push(Task {
            id,
            channel,
            handler: None,
            worker: Some(worker),
        });
    }

    /// Runs callbacks until a channel closes or fails, returning the fault.
    /// Returns [`Fault::Empty`] when no channels remain.
    pub fn run(&mut self) -> Fault {
        if self.tasks.is_empty() {
            return Fault::Empty;
        }
        let mut interval = Self::MIN_INTERVAL;
        let mut waits = 0u32;
        loop {
            let mut calls = 0;
            for task in self.tasks.iter_mut() {
                if !task.channel.is_synchronous() || !task.channel.poll() {
                    continue;
                }
                if task.channel.is_closed() {
                    record_fault(&self.faults, &*task.channel, task.id, None);
                    break;
                }
                match task.handler.as_mut().expect("synchronous task handler")() {
                    Ok(fired) => calls += fired as u32,
                    Err(error) => {
                        record_fault(&self.faults, &*task.channel, task.id, Some(error));
                        break;
                    }
                }
            }

            let fault = self.faults.lock().unwrap().pop_front();
            if let Some(fault) = fault {
                if let Some(id) = fault.channel() {
                    self.drop_channel(id);
                }
                return fault;
            }

            if calls == 0 {
                waits += 1;
                interval = if waits == 1 {
                    Self::MIN_INTERVAL
                } else {
                    (interval * 2).min(Self::MAX_INTERVAL)
                };
                thread::sleep(interval);
            } else {
                waits = 0;
                thread::yield_now();
            }
        }
    }

    /// Closes every attached channel and drains the resulting faults.
    pub fn stop(&mut self) {
        for task in &self.tasks {
            task.channel.close();
        }
        while !self.tasks.is_empty() {
            self.run();
        }
    }

    fn drop_channel(&mut self, id: ChannelId) {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            let task = self.tasks.remove(pos);
            if let Some(worker) = task.worker {
                // The worker pushed the fault on its way out, so this join
                // does not block on channel activity.
                let _ = worker.join();
            }
        }
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatch {
    fn drop(&mut self) {
        self.stop();
    }
}
