//! Rust-native building blocks for systems tooling.
//!
//! Tern is a collection of small crates around a common theme: a uniform
//! waitable-channel abstraction with a cooperative dispatcher, backed by
//! fixed-width binary integers, a cross-platform path core, and
//! deterministic random engines. This crate is a thin umbrella; each piece
//! is usable on its own.

#[doc(inline)]
pub use tern_sync as sync;

#[doc(inline)]
pub use tern_binary as binary;

#[doc(inline)]
pub use tern_time as time;

#[doc(inline)]
pub use tern_random as random;

#[doc(inline)]
pub use tern_path as path;
