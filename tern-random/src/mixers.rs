use tern_binary::Uint128;

// LCG transforms for 32, 64 and 128 bits, constants from Pierre L'Ecuyer
// (1999), "Tables of Linear Congruential Generators of Different Sizes and
// Good Lattice Structure".

pub fn lcg32(x: u32) -> u32 {
    const M: u32 = 32_310_901;
    const C: u32 = 850_757_001;
    M.wrapping_mul(x).wrapping_add(C)
}

pub fn lcg64(x: u64) -> u64 {
    const M: u64 = 3_935_559_000_370_003_845;
    const C: u64 = 8_831_144_850_135_198_739;
    M.wrapping_mul(x).wrapping_add(C)
}

pub fn lcg128(x: Uint128) -> Uint128 {
    const M: Uint128 = Uint128::from_words(&[0x2360_ed05_1fc6_5da4, 0x4385_df64_9fcc_f645]);
    const C: Uint128 = Uint128::from_words(&[0x55bf_e625_0318_f820, 0xe2d4_afe5_108d_a1e3]);
    M.wrapping_mul(x).wrapping_add(C)
}

// Squirrel3 bijective mixers by Squirrel Eiserloh; suitable as indexed RNG.

pub fn squirrel32(mut x: u32) -> u32 {
    const A: u32 = 0xb529_7a4d;
    const B: u32 = 0x68e3_1da4;
    const C: u32 = 0x1b56_c4e9;
    x = x.wrapping_mul(A);
    x ^= x >> 8;
    x = x.wrapping_add(B);
    x ^= x << 8;
    x = x.wrapping_mul(C);
    x ^= x >> 8;
    x
}

pub fn squirrel64(mut x: u64) -> u64 {
    const A: u64 = 0x9e37_79b1_85eb_ca87;
    const B: u64 = 0xc2b2_ae3d_27d4_eb4f;
    const C: u64 = 0x27d4_eb2f_1656_67c5;
    x = x.wrapping_mul(A);
    x ^= x >> 8;
    x = x.wrapping_add(B);
    x ^= x << 8;
    x = x.wrapping_mul(C);
    x ^= x >> 8;
    x
}

/// One step of the SplitMix64 mixer applied to `x + golden`, returning the
/// mixed value. See [`SplitMix64`](crate::SplitMix64) for the stateful form.
pub fn splitmix64(x: u64) -> u64 {
    const B: u64 = 0xbf58_476d_1ce4_e5b9;
    const C: u64 = 0x94d0_49bb_1331_11eb;
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(B);
    z = (z ^ (z >> 27)).wrapping_mul(C);
    z ^ (z >> 31)
}
