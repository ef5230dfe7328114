use rand::{Error, RngCore};
use tern_binary::Uint128;

use crate::mixers::{lcg128, lcg32, lcg64, squirrel32, squirrel64};

macro_rules! impl_rngcore_u32 {
    ($($engine:ty),*) => {$(
        impl RngCore for $engine {
            fn next_u32(&mut self) -> u32 {
                self.next()
            }

            fn next_u64(&mut self) -> u64 {
                let lo = self.next() as u64;
                let hi = self.next() as u64;
                (hi << 32) | lo
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                for chunk in dest.chunks_mut(4) {
                    let bytes = self.next().to_le_bytes();
                    chunk.copy_from_slice(&bytes[..chunk.len()]);
                }
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_rngcore_u64 {
    ($($engine:ty),*) => {$(
        impl RngCore for $engine {
            fn next_u32(&mut self) -> u32 {
                (self.next() >> 32) as u32
            }

            fn next_u64(&mut self) -> u64 {
                self.next()
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                for chunk in dest.chunks_mut(8) {
                    let bytes = self.next().to_le_bytes();
                    chunk.copy_from_slice(&bytes[..chunk.len()]);
                }
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }
    )*};
}

/// Linear-congruential generator with 32 bits of state and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = u32::MAX;

    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u32 {
        self.state = lcg32(self.state);
        self.state
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }
}

/// Linear-congruential generator with 64 bits of state and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        self.state = lcg64(self.state);
        self.state
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }
}

/// Linear-congruential generator with 128 bits of state and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lcg128 {
    state: Uint128,
}

impl Lcg128 {
    pub const MIN: Uint128 = Uint128::MIN;
    pub const MAX: Uint128 = Uint128::MAX;

    pub const fn new(hi: u64, lo: u64) -> Self {
        Self {
            state: Uint128::from_words(&[hi, lo]),
        }
    }

    pub fn next(&mut self) -> Uint128 {
        self.state = lcg128(self.state);
        self.state
    }

    pub fn seed(&mut self, hi: u64, lo: u64) {
        self.state = Uint128::from_words(&[hi, lo]);
    }
}

/// Stateful Squirrel3 walk over 32-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Squirrel32 {
    state: u32,
}

impl Squirrel32 {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = u32::MAX;

    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u32 {
        self.state = squirrel32(self.state);
        self.state
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }
}

/// Stateful Squirrel3 walk over 64-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Squirrel64 {
    state: u64,
}

impl Squirrel64 {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        self.state = squirrel64(self.state);
        self.state
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }
}

/// SplitMix64 by Sebastiano Vigna; mainly used to expand short seeds for
/// the other engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GOLDEN);
        crate::mixers::splitmix64(self.state)
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }
}

/// PCG64 XSL-RR by Melissa O'Neill: 128-bit LCG state, output is the
/// rotated xor-fold of the halves. <https://www.pcg-random.org/>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pcg64 {
    state: Uint128,
}

impl Pcg64 {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    const DEFAULT_SEED: u64 = 0xcafe_f00d_d15e_a5e5;
    const A: Uint128 = Uint128::from_words(&[0x2360_ed05_1fc6_5da4, 0x4385_df64_9fcc_f645]);
    const B: Uint128 = Uint128::from_words(&[0x5851_f42d_4c95_7f2d, 0x1405_7b7e_f767_814f]);

    pub fn new(seed: u64) -> Self {
        let mut engine = Self {
            state: Uint128::from_u64(seed),
        };
        engine.init();
        engine
    }

    pub fn new_wide(hi: u64, lo: u64) -> Self {
        let mut engine = Self {
            state: Uint128::from_words(&[hi, lo]),
        };
        engine.init();
        engine
    }

    pub fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(Self::A).wrapping_add(Self::B);
        let x = (self.state >> 64).to_u64() ^ self.state.to_u64();
        let rot = ((self.state >> 122).to_u64() & 63) as u32;
        x.rotate_right(rot)
    }

    /// Jumps the stream by `offset` steps, negative to rewind, in
    /// O(log |offset|).
    pub fn advance(&mut self, offset: i64) {
        let mut delta = Uint128::from_u64(offset as u64);
        if offset < 0 {
            delta = delta | (!Uint128::ZERO << 64);
        }
        let mut mul = Uint128::ONE;
        let mut add = Uint128::ZERO;
        let mut c = Self::A;
        let mut d = Self::B;
        while !delta.is_zero() {
            if delta.bit(0) {
                mul = mul.wrapping_mul(c);
                add = add.wrapping_mul(c).wrapping_add(d);
            }
            let c1 = c.wrapping_add(Uint128::ONE);
            d = d.wrapping_mul(c1);
            c = c.wrapping_mul(c);
            delta = delta >> 1;
        }
        self.state = self.state.wrapping_mul(mul).wrapping_add(add);
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = Uint128::from_u64(seed);
        self.init();
    }

    pub fn seed_wide(&mut self, hi: u64, lo: u64) {
        self.state = Uint128::from_words(&[hi, lo]);
        self.init();
    }

    fn init(&mut self) {
        self.state = self
            .state
            .wrapping_add(Self::B)
            .wrapping_mul(Self::A)
            .wrapping_add(Self::B);
    }
}

impl Default for Pcg64 {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// PCG64 DXSM: the double-xorshift-multiply output function, after Tony
/// Finch's write-up. <https://dotat.at/@/2023-06-21-pcg64-dxsm.html>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pcg64Dxsm {
    state: Uint128,
    inc: Uint128,
}

impl Pcg64Dxsm {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    const DEFAULT_SEED: u64 = 0xcafe_f00d_d15e_a5e5;
    const MUL: u64 = 0xda94_2042_e4dd_58b5;

    pub fn new(seed: u64) -> Self {
        let mut engine = Self {
            state: Uint128::ZERO,
            inc: Uint128::ZERO,
        };
        engine.seed(seed);
        engine
    }

    pub fn next(&mut self) -> u64 {
        let st = self.state;
        self.state = st
            .wrapping_mul(Uint128::from_u64(Self::MUL))
            .wrapping_add(self.inc);
        let mut hi = (st >> 64).to_u64();
        let lo = st.to_u64() | 1;
        hi ^= hi >> 32;
        hi = hi.wrapping_mul(Self::MUL);
        hi ^= hi >> 48;
        hi.wrapping_mul(lo)
    }

    pub fn seed(&mut self, seed: u64) {
        self.seed4(0, seed, 0, 0);
    }

    pub fn seed2(&mut self, s0: u64, s1: u64) {
        self.seed4(s0, s1, 0, 0);
    }

    pub fn seed4(&mut self, s0: u64, s1: u64, s2: u64, s3: u64) {
        self.state = Uint128::from_words(&[s0, s1]);
        self.inc = (Uint128::from_words(&[s2, s3]) << 1) | Uint128::ONE;
        self.state = self.state.wrapping_add(self.inc);
        self.next();
    }
}

impl Default for Pcg64Dxsm {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Xoshiro256** by David Blackman and Sebastiano Vigna.
/// <https://prng.di.unimi.it/>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xoshiro256 {
    state: [u64; 4],
}

impl Xoshiro256 {
    pub const MIN: u64 = 0;
    pub const MAX: u64 = u64::MAX;

    pub fn new(seed: u64) -> Self {
        let mut engine = Self { state: [0; 4] };
        engine.seed(seed);
        engine
    }

    pub fn next(&mut self) -> u64 {
        let out = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        out
    }

    /// Short seeds are expanded through SplitMix64, per the authors'
    /// recommendation.
    pub fn seed(&mut self, seed: u64) {
        let mut sm = SplitMix64::new(seed);
        self.state = [sm.next(), sm.next(), sm.next(), sm.next()];
    }

    pub fn seed2(&mut self, s: u64, t: u64) {
        let mut sm = SplitMix64::new(s);
        self.state[0] = sm.next();
        self.state[1] = sm.next();
        sm.seed(t);
        self.state[2] = sm.next();
        self.state[3] = sm.next();
    }

    pub fn seed4(&mut self, s0: u64, s1: u64, s2: u64, s3: u64) {
        self.state = [s0, s1, s2, s3];
    }
}

impl Default for Xoshiro256 {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Default engine choice for callers with no particular requirement.
pub type StdEngine = Pcg64Dxsm;

impl_rngcore_u32!(Lcg32, Squirrel32);
impl_rngcore_u64!(Lcg64, Squirrel64, SplitMix64, Pcg64, Pcg64Dxsm, Xoshiro256);

/// Seeding from the platform entropy source, with the engine's full
/// seeding arity.
pub trait SeedFromDevice {
    fn seed_from_device(&mut self);
}

fn device_word() -> u64 {
    rand::rngs::OsRng.next_u64()
}

impl SeedFromDevice for Lcg32 {
    fn seed_from_device(&mut self) {
        self.seed(rand::rngs::OsRng.next_u32());
    }
}

impl SeedFromDevice for Squirrel32 {
    fn seed_from_device(&mut self) {
        self.seed(rand::rngs::OsRng.next_u32());
    }
}

impl SeedFromDevice for Lcg64 {
    fn seed_from_device(&mut self) {
        self.seed(device_word());
    }
}

impl SeedFromDevice for Squirrel64 {
    fn seed_from_device(&mut self) {
        self.seed(device_word());
    }
}

impl SeedFromDevice for SplitMix64 {
    fn seed_from_device(&mut self) {
        self.seed(device_word());
    }
}

impl SeedFromDevice for Lcg128 {
    fn seed_from_device(&mut self) {
        self.seed(device_word(), device_word());
    }
}

impl SeedFromDevice for Pcg64 {
    fn seed_from_device(&mut self) {
        self.seed_wide(device_word(), device_word());
    }
}

impl SeedFromDevice for Pcg64Dxsm {
    fn seed_from_device(&mut self) {
        self.seed4(device_word(), device_word(), device_word(), device_word());
    }
}

impl SeedFromDevice for Xoshiro256 {
    fn seed_from_device(&mut self) {
        self.seed4(device_word(), device_word(), device_word(), device_word());
    }
}

/// Reseeds any [`SeedFromDevice`] engine from the OS entropy source.
pub fn seed_from_device<E: SeedFromDevice>(engine: &mut E) {
    engine.seed_from_device();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_reference_vector() {
        let mut sm = SplitMix64::new(0);
        assert_eq!(sm.next(), 0xe220_a839_7b1d_cdaf);
        assert_eq!(sm.next(), 0x6e78_9e6a_a1b9_65f4);
        assert_eq!(sm.next(), 0x06c4_5d18_8009_454f);
    }

    #[test]
    fn engines_are_reproducible() {
        let mut a = Pcg64::new(42);
        let mut b = Pcg64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }

        let mut c = Pcg64Dxsm::new(42);
        let mut d = Pcg64Dxsm::new(42);
        assert_eq!(
            (0..32).map(|_| c.next()).collect::<Vec<_>>(),
            (0..32).map(|_| d.next()).collect::<Vec<_>>()
        );

        let mut e = Xoshiro256::new(7);
        let mut f = Xoshiro256::new(7);
        assert_eq!(e.next(), f.next());
        assert_ne!(Xoshiro256::new(1).next(), Xoshiro256::new(2).next());
    }

    #[test]
    fn pcg_advance_matches_stepping() {
        let mut stepped = Pcg64::new(99);
        let mut jumped = Pcg64::new(99);
        let mut tail = Vec::new();
        for _ in 0..1000 {
            tail.push(stepped.next());
        }
        jumped.advance(997);
        assert_eq!(jumped.next(), tail[997]);
        assert_eq!(jumped.next(), tail[998]);
        jumped.advance(-999);
        assert_eq!(jumped.next(), tail[0]);
    }

    #[test]
    fn lcg128_output_has_width() {
        let mut rng = Lcg128::new(0, 1);
        let x = rng.next();
        assert!(x.significant_bits() <= 128);
        assert_ne!(rng.next(), x);
    }

    #[test]
    fn device_seeding_changes_state() {
        let mut a = Pcg64Dxsm::default();
        let before = a;
        seed_from_device(&mut a);
        // Equality after an OS reseed would mean the entropy words were all
        // identical to the defaults; treat it as failure.
        assert_ne!(a, before);
    }
}
