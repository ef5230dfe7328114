use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::TimeError;

const SECS_PER_DAY: u64 = 86_400;
const JULIAN_YEAR_SECS: f64 = 86_400.0 * 365.25;

/// Formats a duration as `[Nd][Nh][Nm]N[.fff]s`, padding inner fields to
/// two digits. `prec` is the number of fractional-second digits.
///
/// ```
/// use std::time::Duration;
/// use tern_time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90_061), 0), "1d01h01m01s");
/// assert_eq!(format_duration(Duration::from_millis(1_250), 3), "1.250s");
/// ```
pub fn format_duration(d: Duration, prec: usize) -> String {
    let mut isec = d.as_secs();
    let fsec = d.subsec_nanos() as f64 / 1e9;
    let mut out = String::new();

    let days = isec / SECS_PER_DAY;
    isec -= days * SECS_PER_DAY;
    if days != 0 {
        out.push_str(&format!("{days}d"));
    }

    let hours = isec / 3_600;
    isec -= hours * 3_600;
    if days != 0 || hours != 0 {
        if days != 0 {
            out.push_str(&format!("{hours:02}h"));
        } else {
            out.push_str(&format!("{hours}h"));
        }
    }

    let mins = isec / 60;
    isec -= mins * 60;
    if days != 0 || hours != 0 || mins != 0 {
        if days != 0 || hours != 0 {
            out.push_str(&format!("{mins:02}m"));
        } else {
            out.push_str(&format!("{mins}m"));
        }
    }

    if days != 0 || hours != 0 || mins != 0 {
        out.push_str(&format!("{isec:02}"));
    } else {
        out.push_str(&format!("{isec}"));
    }

    if prec > 0 {
        let frac = format!("{fsec:.prec$}");
        out.push_str(&frac[1..]);
    }

    out.push('s');
    out
}

static TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)([A-Za-zµ]*)").unwrap()
});

/// Parses a duration written as one or more unit-suffixed terms, e.g.
/// `"1h30m"`, `"250ms"`, `"1.5d"`. Whitespace is ignored; the terms are
/// summed. A bare trailing number counts as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, TimeError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let mut rest = compact.as_str();

    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if rest.starts_with('-') {
        return Err(TimeError::OutOfRange);
    }

    if rest.is_empty() {
        return Err(TimeError::InvalidFormat(s.to_owned()));
    }

    let mut seconds = 0.0f64;

    while !rest.is_empty() {
        let caps = TERM
            .captures(rest)
            .ok_or_else(|| TimeError::InvalidFormat(s.to_owned()))?;
        let count: f64 = caps[1]
            .parse()
            .map_err(|_| TimeError::InvalidFormat(s.to_owned()))?;
        let unit = &caps[2];

        let scaled = match unit_scale(unit) {
            Some(scale) => count * scale,
            None => return Err(TimeError::InvalidFormat(s.to_owned())),
        };

        seconds += scaled;
        rest = &rest[caps[0].len()..];
    }

    Duration::try_from_secs_f64(seconds).map_err(|_| TimeError::OutOfRange)
}

fn unit_scale(unit: &str) -> Option<f64> {
    let prefix: String = unit.chars().take(2).collect();
    let scale = match prefix.as_str() {
        "Yy" => JULIAN_YEAR_SECS * 1e24,
        "Zy" => JULIAN_YEAR_SECS * 1e21,
        "Ey" => JULIAN_YEAR_SECS * 1e18,
        "Py" => JULIAN_YEAR_SECS * 1e15,
        "Ty" => JULIAN_YEAR_SECS * 1e12,
        "Gy" => JULIAN_YEAR_SECS * 1e9,
        "My" => JULIAN_YEAR_SECS * 1e6,
        "ky" => JULIAN_YEAR_SECS * 1e3,
        "ms" => 1e-3,
        "us" | "µs" => 1e-6,
        "ns" => 1e-9,
        "ps" => 1e-12,
        "fs" => 1e-15,
        "as" => 1e-18,
        "zs" => 1e-21,
        "ys" => 1e-24,
        _ => match unit.chars().next() {
            Some('y') => JULIAN_YEAR_SECS,
            Some('d') => SECS_PER_DAY as f64,
            Some('h') => 3_600.0,
            Some('m') => 60.0,
            Some('s') | None => 1.0,
            _ => return None,
        },
    };
    Some(scale)
}
