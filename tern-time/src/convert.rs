use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: u64 = 1_000_000_000;
const MICROS_PER_SEC: u64 = 1_000_000;

/// Seconds between the FILETIME epoch (1601-01-01) and the unix epoch.
pub const FILETIME_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;

/// FILETIME ticks are 100 ns.
pub const FILETIME_TICKS_PER_SEC: u64 = 10_000_000;

/// Splits a [`SystemTime`] into signed unix-epoch seconds and a nanosecond
/// remainder in `[0, 1e9)`; times before the epoch yield negative seconds.
pub fn system_time_to_unix(t: SystemTime) -> (i64, u32) {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => (d.as_secs() as i64, d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            if d.subsec_nanos() == 0 {
                (-(d.as_secs() as i64), 0)
            } else {
                (
                    -(d.as_secs() as i64) - 1,
                    (NANOS_PER_SEC as u32) - d.subsec_nanos(),
                )
            }
        }
    }
}

/// Inverse of [`system_time_to_unix`].
pub fn unix_to_system_time(secs: i64, nanos: u32) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, nanos)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + Duration::from_nanos(nanos as u64)
    }
}

/// Converts a FILETIME tick count (100 ns units since 1601-01-01) to a
/// [`SystemTime`]. Pure arithmetic, usable on every platform.
pub fn filetime_to_system_time(ticks: u64) -> SystemTime {
    let secs = ticks / FILETIME_TICKS_PER_SEC;
    let nanos = (ticks % FILETIME_TICKS_PER_SEC) * 100;
    if secs >= FILETIME_EPOCH_OFFSET_SECS {
        UNIX_EPOCH + Duration::new(secs - FILETIME_EPOCH_OFFSET_SECS, nanos as u32)
    } else {
        UNIX_EPOCH - Duration::from_secs(FILETIME_EPOCH_OFFSET_SECS - secs)
            + Duration::from_nanos(nanos)
    }
}

/// Inverse of [`filetime_to_system_time`]. Times before 1601 saturate to 0.
pub fn system_time_to_filetime(t: SystemTime) -> u64 {
    let (secs, nanos) = system_time_to_unix(t);
    let since_1601 = secs + FILETIME_EPOCH_OFFSET_SECS as i64;
    if since_1601 < 0 {
        return 0;
    }
    since_1601 as u64 * FILETIME_TICKS_PER_SEC + nanos as u64 / 100
}

#[cfg(unix)]
pub fn duration_to_timespec(d: Duration) -> libc::timespec {
    libc::timespec {
        tv_sec: d.as_secs() as libc::time_t,
        tv_nsec: d.subsec_nanos() as _,
    }
}

#[cfg(unix)]
pub fn timespec_to_duration(ts: &libc::timespec) -> Duration {
    Duration::new(ts.tv_sec.max(0) as u64, ts.tv_nsec.max(0) as u32)
}

#[cfg(unix)]
pub fn duration_to_timeval(d: Duration) -> libc::timeval {
    libc::timeval {
        tv_sec: d.as_secs() as libc::time_t,
        tv_usec: d.subsec_micros() as _,
    }
}

#[cfg(unix)]
pub fn timeval_to_duration(tv: &libc::timeval) -> Duration {
    Duration::new(tv.tv_sec.max(0) as u64, tv.tv_usec.max(0) as u32 * 1_000)
}

/// Converts a [`SystemTime`] to a timespec with signed seconds, so
/// pre-epoch times survive the round trip.
#[cfg(unix)]
pub fn system_time_to_timespec(t: SystemTime) -> libc::timespec {
    let (secs, nanos) = system_time_to_unix(t);
    libc::timespec {
        tv_sec: secs as libc::time_t,
        tv_nsec: nanos as _,
    }
}

#[cfg(unix)]
pub fn timespec_to_system_time(ts: &libc::timespec) -> SystemTime {
    unix_to_system_time(ts.tv_sec as i64, ts.tv_nsec as u32)
}

/// Splits a duration into whole microseconds, for APIs taking timeval-style
/// counters.
pub fn duration_to_micros(d: Duration) -> u64 {
    d.as_secs() * MICROS_PER_SEC + d.subsec_micros() as u64
}
