//! Random number engines and statistical distributions.
//!
//! The engines are small deterministic generators with fixed unsigned
//! output widths; given the same seed they produce bit-identical streams on
//! every platform. They plug into the wider ecosystem through
//! [`rand::RngCore`], and [`seed_from_device`] pulls fresh entropy from the
//! operating system. Distributions layer on any `RngCore`.

mod distributions;
mod engines;
mod mixers;
mod stats;

pub use distributions::{
    Bernoulli, DistributionError, LogNormal, LogNormalMode, LogUniform, Normal, Poisson,
    UniformInt, UniformReal,
};
pub use engines::{
    seed_from_device, Lcg128, Lcg32, Lcg64, Pcg64, Pcg64Dxsm, SeedFromDevice, SplitMix64,
    Squirrel32, Squirrel64, StdEngine, Xoshiro256,
};
pub use mixers::{lcg128, lcg32, lcg64, splitmix64, squirrel32, squirrel64};
pub use stats::Statistics;
