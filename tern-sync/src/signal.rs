use std::collections::VecDeque;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;

use crate::channel::{Channel, MessageChannel};
use crate::waiter::Waiter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("invalid signal number {0}")]
    InvalidSignal(i32),

    #[error("failed to update the signal mask (errno {0})")]
    MaskFailed(i32),
}

/// Channel delivering OS signals as messages.
///
/// Construction blocks the listed signals process-wide (plus `SIGUSR1`,
/// which is reserved as the wake-up signal for orderly close) and waits for
/// them with `sigtimedwait`. Dropping the channel drains any still-pending
/// listed signals and restores the previous mask.
///
/// The blocked mask is per-process state: create at most one listener per
/// signal, before spawning threads that must not inherit the mask.
pub struct SignalChannel {
    signals: Vec<i32>,
    mask: libc::sigset_t,
    old_mask: libc::sigset_t,
    queue: Mutex<VecDeque<i32>>,
    open: AtomicBool,
}

// sigset_t is plain data and the queue is locked.
unsafe impl Send for SignalChannel {}
unsafe impl Sync for SignalChannel {}

impl SignalChannel {
    pub fn new(signals: &[i32]) -> Result<Self, SignalError> {
        let mut listed: Vec<i32> = signals.to_vec();
        listed.push(libc::SIGUSR1);

        unsafe {
            let mut mask = MaybeUninit::<libc::sigset_t>::uninit();
            let mut old_mask = MaybeUninit::<libc::sigset_t>::uninit();
            libc::sigemptyset(mask.as_mut_ptr());
            libc::sigemptyset(old_mask.as_mut_ptr());
            for &s in &listed {
                if libc::sigaddset(mask.as_mut_ptr(), s) != 0 {
                    return Err(SignalError::InvalidSignal(s));
                }
            }
            let mask = mask.assume_init();
            let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &mask, old_mask.as_mut_ptr());
            if rc != 0 {
                return Err(SignalError::MaskFailed(rc));
            }
            Ok(Self {
                signals: listed,
                mask,
                old_mask: old_mask.assume_init(),
                queue: Mutex::new(VecDeque::new()),
                open: AtomicBool::new(true),
            })
        }
    }
}

impl Waiter for SignalChannel {
    #[cfg(not(target_os = "macos"))]
    fn wait_for(&self, timeout: Duration) -> bool {
        if !self.open.load(Ordering::SeqCst) || !self.queue.lock().unwrap().is_empty() {
            return true;
        }
        let ts = tern_time::duration_to_timespec(timeout);
        let s = unsafe { libc::sigtimedwait(&self.mask, ptr::null_mut(), &ts) };
        if !self.open.load(Ordering::SeqCst) {
            return true;
        }
        if s == -1 {
            return false;
        }
        self.queue.lock().unwrap().push_back(s);
        true
    }

    // No sigtimedwait on macOS: poll the pending set instead.
    #[cfg(target_os = "macos")]
    fn wait_for(&self, timeout: Duration) -> bool {
        let delta = Duration::from_millis(10);
        let mut remaining = timeout;
        loop {
            if !self.open.load(Ordering::SeqCst) || !self.queue.lock().unwrap().is_empty() {
                return true;
            }
            let mut found = None;
            unsafe {
                let mut pending = MaybeUninit::<libc::sigset_t>::uninit();
                libc::sigemptyset(pending.as_mut_ptr());
                libc::sigpending(pending.as_mut_ptr());
                let pending = pending.assume_init();
                for &s in &self.signals {
                    if libc::sigismember(&pending, s) == 1 {
                        found = Some(s);
                        break;
                    }
                }
                if let Some(s) = found {
                    let mut one = MaybeUninit::<libc::sigset_t>::uninit();
                    libc::sigemptyset(one.as_mut_ptr());
                    libc::sigaddset(one.as_mut_ptr(), s);
                    let mut taken = 0;
                    libc::sigwait(one.as_ptr(), &mut taken);
                    self.queue.lock().unwrap().push_back(taken);
                    return true;
                }
            }
            if remaining.is_zero() {
                return false;
            }
            let step = remaining.min(delta);
            std::thread::sleep(step);
            remaining -= step;
        }
    }
}

impl Channel for SignalChannel {
    fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            unsafe {
                libc::raise(libc::SIGUSR1);
            }
        }
    }

    fn is_closed(&self) -> bool {
        !self.open.load(Ordering::SeqCst)
    }
}

impl MessageChannel for SignalChannel {
    type Item = i32;

    fn read(&self) -> Option<i32> {
        if !self.open.load(Ordering::SeqCst) {
            return None;
        }
        self.queue.lock().unwrap().pop_front()
    }
}

impl Drop for SignalChannel {
    fn drop(&mut self) {
        unsafe {
            let mut pending = MaybeUninit::<libc::sigset_t>::uninit();
            libc::sigemptyset(pending.as_mut_ptr());
            libc::sigpending(pending.as_mut_ptr());
            let pending = pending.assume_init();
            for &s in &self.signals {
                if libc::sigismember(&pending, s) == 1 {
                    let mut taken = 0;
                    let mut one = MaybeUninit::<libc::sigset_t>::uninit();
                    libc::sigemptyset(one.as_mut_ptr());
                    libc::sigaddset(one.as_mut_ptr(), s);
                    libc::sigwait(one.as_ptr(), &mut taken);
                }
            }
            libc::pthread_sigmask(libc::SIG_SETMASK, &self.old_mask, ptr::null_mut());
        }
    }
}

/// Canonical name for a signal number: `SIGINT`, `SIGRTMIN+3`, or the
/// decimal number for anything unrecognised.
pub fn signal_name(signal: i32) -> String {
    let name = match signal {
        libc::SIGABRT => "SIGABRT",
        libc::SIGALRM => "SIGALRM",
        libc::SIGBUS => "SIGBUS",
        libc::SIGCHLD => "SIGCHLD",
        libc::SIGCONT => "SIGCONT",
        libc::SIGFPE => "SIGFPE",
        libc::SIGHUP => "SIGHUP",
        libc::SIGILL => "SIGILL",
        libc::SIGINT => "SIGINT",
        libc::SIGKILL => "SIGKILL",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGPROF => "SIGPROF",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGSTOP => "SIGSTOP",
        libc::SIGSYS => "SIGSYS",
        libc::SIGTERM => "SIGTERM",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGTSTP => "SIGTSTP",
        libc::SIGTTIN => "SIGTTIN",
        libc::SIGTTOU => "SIGTTOU",
        libc::SIGURG => "SIGURG",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGVTALRM => "SIGVTALRM",
        libc::SIGWINCH => "SIGWINCH",
        libc::SIGXCPU => "SIGXCPU",
        libc::SIGXFSZ => "SIGXFSZ",
        _ => "",
    };
    if !name.is_empty() {
        return name.to_owned();
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        let rtmin = libc::SIGRTMIN();
        let rtmax = libc::SIGRTMAX();
        if signal == rtmin {
            return "SIGRTMIN".to_owned();
        }
        if signal == rtmax {
            return "SIGRTMAX".to_owned();
        }
        if signal > rtmin && signal < rtmax {
            return format!("SIGRTMIN+{}", signal - rtmin);
        }
    }

    signal.to_string()
}
