//! Fixed-width binary integers.
//!
//! [`Binary`] is an unsigned integer of an exact bit width, with wrapping
//! (modulo `2^BITS`) arithmetic. Widths up to 64 bits fit in a single limb;
//! wider values are stored as little-endian 32-bit limbs with the top limb
//! masked, so every bit outside the declared width is always zero.

mod binary;
mod parse;

pub use binary::{Binary, TryFromBinaryError, Uint128, Uint256, Uint512, Uint1024};
pub use parse::ParseBinaryError;
