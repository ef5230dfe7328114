//! Time utilities: conversions between [`std::time`] types and the
//! platform-native representations (timespec, timeval, FILETIME, unix
//! epoch), plus human-oriented duration formatting and parsing.

mod convert;
mod format;

pub use convert::*;
pub use format::{format_duration, parse_duration};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid time string {0:?}")]
    InvalidFormat(String),

    #[error("time value out of range")]
    OutOfRange,
}
