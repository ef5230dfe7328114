//! Cross-platform path core: canonical path spelling, pure-name algebra
//! (split, join, relative paths), directory and deep-search iterators, and
//! filesystem operations with explicit flag control.
//!
//! [`Path`] wraps a native-encoded name that is canonicalised on
//! construction; canonicalisation is idempotent, so a path's spelling can
//! be compared byte-for-byte.

mod error;
mod flags;
mod fs;
mod iter;
mod path;

pub use error::PathError;
pub use flags::PathFlags;
pub use iter::{DeepIterator, DirIterator};
pub use path::{Form, Kind, Path};
