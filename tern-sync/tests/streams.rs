use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tern_sync::{
    BufferChannel, Channel, ChannelId, Dispatch, GeneratorChannel, StreamChannel, ValueChannel,
};

#[test]
fn read_all_collects_until_close() {
    let chan = Arc::new(BufferChannel::new());
    let writer = {
        let chan = chan.clone();
        thread::spawn(move || {
            for chunk in [&b"alpha "[..], b"beta ", b"gamma"] {
                assert!(chan.write(chunk));
                thread::sleep(Duration::from_millis(5));
            }
            // Close clears the buffer, so give the reader time to drain.
            thread::sleep(Duration::from_millis(100));
            chan.close();
        })
    };

    let all = chan.read_all();
    writer.join().unwrap();
    assert_eq!(all, b"alpha beta gamma");
}

#[test]
fn generator_through_dispatch() {
    let mut n = 0;
    let chan = Arc::new(GeneratorChannel::new(move || {
        n += 1;
        n
    }));
    let mut disp = Dispatch::new();
    let total = Arc::new(AtomicUsize::new(0));

    let cb_chan = chan.clone();
    let cb_total = total.clone();
    disp.add_message(chan.clone(), move |value: i32| {
        cb_total.fetch_add(value as usize, Ordering::SeqCst);
        if value == 10 {
            cb_chan.close();
        }
        Ok(())
    });

    let fault = disp.run();
    assert!(fault.is_closed());
    assert_eq!(fault.channel(), Some(ChannelId::of(&chan)));
    assert_eq!(total.load(Ordering::SeqCst), 55);
    disp.stop();
}

#[test]
fn value_channel_through_dispatch() {
    let chan = Arc::new(ValueChannel::new());
    let mut disp = Dispatch::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    // Coalesced duplicates collapse to the latest distinct value.
    chan.write("one");
    chan.write("two");
    chan.write("two");

    let cb_chan = chan.clone();
    let cb_seen = seen.clone();
    disp.add_message(chan.clone(), move |value: &str| {
        cb_seen.lock().unwrap().push(value);
        cb_chan.close();
        Ok(())
    });

    let fault = disp.run();
    assert!(fault.is_closed());
    assert_eq!(*seen.lock().unwrap(), vec!["two"]);
    disp.stop();
}
