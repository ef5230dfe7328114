#![cfg(unix)]

use std::time::Duration;

use tern_sync::{signal_name, Channel, MessageChannel, SignalChannel, Waiter};

// Everything lives in one test because the blocked signal mask is
// process-global state; raising is thread-directed, so the raise and the
// wait stay on this thread.
#[test]
fn delivers_raised_signal_then_closes() {
    let chan = SignalChannel::new(&[libc::SIGUSR2]).unwrap();

    assert!(!chan.wait_for(Duration::ZERO));

    unsafe {
        libc::raise(libc::SIGUSR2);
    }

    assert!(chan.wait_for(Duration::from_millis(500)));
    assert_eq!(chan.read(), Some(libc::SIGUSR2));
    assert_eq!(chan.read(), None);

    chan.close();
    assert!(chan.is_closed());
    assert!(chan.wait_for(Duration::ZERO));
    assert_eq!(chan.read(), None);
}

#[test]
fn rejects_bad_signal_numbers() {
    assert!(SignalChannel::new(&[-1]).is_err());
}

#[test]
fn names() {
    assert_eq!(signal_name(libc::SIGHUP), "SIGHUP");
    assert_eq!(signal_name(libc::SIGUSR2), "SIGUSR2");
}
