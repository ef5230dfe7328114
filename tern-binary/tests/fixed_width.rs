use quickcheck_macros::quickcheck;
use tern_binary::{Binary, Uint128, Uint256};

type Bin5 = Binary<5, 1>;
type Bin35 = Binary<35, 2>;
type Bin100 = Binary<100, 4>;

#[test]
fn width_5_formatting() {
    let x = Bin5::from_u64(25);
    let y = Bin5::from_u64(10);
    let z = Bin5::ZERO;

    assert_eq!(Bin5::MAX.to_u64(), 31);

    assert_eq!(x.bin(), "11001");
    assert_eq!(y.bin(), "01010");
    assert_eq!(z.bin(), "00000");
    assert_eq!(x.dec(), "25");
    assert_eq!(y.dec(), "10");
    assert_eq!(z.dec(), "0");
    assert_eq!(x.hex(), "19");
    assert_eq!(y.hex(), "0a");
    assert_eq!(z.hex(), "00");

    assert_eq!(x.to_f64(), 25.0);
    assert_eq!(Bin5::from_f64(25.0), x);
    assert_eq!(Bin5::from_f64(42.0).to_u64(), 10);
    assert_eq!(x.significant_bits(), 5);
    assert_eq!(y.significant_bits(), 4);
    assert_eq!(z.significant_bits(), 0);
}

#[test]
fn width_5_arithmetic() {
    let x = Bin5::from_u64(25);
    let y = Bin5::from_u64(10);

    assert_eq!(x.wrapping_neg().to_u64(), 7);
    assert_eq!(y.wrapping_neg().to_u64(), 22);
    assert_eq!(Bin5::ZERO.wrapping_neg(), Bin5::ZERO);

    assert_eq!((!x).to_u64(), 6);
    assert_eq!((!y).to_u64(), 21);
    assert_eq!((!Bin5::ZERO).to_u64(), 31);

    assert_eq!((x + y).to_u64(), 3);
    assert_eq!((x - y).to_u64(), 15);
    assert_eq!((y - x).to_u64(), 17);
    assert_eq!((x * y).to_u64(), 26);
    assert_eq!((x / y).to_u64(), 2);
    assert_eq!((x % y).to_u64(), 5);
    assert_eq!((y / x).to_u64(), 0);
    assert_eq!((y % x).to_u64(), 10);
    assert_eq!((x & y).to_u64(), 8);
    assert_eq!((x | y).to_u64(), 27);
    assert_eq!((x ^ y).to_u64(), 19);
}

#[test]
fn width_5_shifts() {
    let x = Bin5::from_u64(25);
    let shl = [25, 18, 4, 8, 16, 0];
    let shr = [25, 12, 6, 3, 1, 0];
    for (k, (&l, &r)) in shl.iter().zip(shr.iter()).enumerate() {
        assert_eq!((x << k as u32).to_u64(), l, "25 << {k}");
        assert_eq!((x >> k as u32).to_u64(), r, "25 >> {k}");
    }
}

#[test]
fn width_5_rotation() {
    let y = Bin5::from_u64(10);
    let left = [10, 20, 9, 18, 5, 10, 20, 9, 18, 5, 10];
    let right = [10, 5, 18, 9, 20, 10, 5, 18, 9, 20, 10];
    for (k, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
        assert_eq!(y.rotl(k as u32).to_u64(), l, "rotl {k}");
        assert_eq!(y.rotr(k as u32).to_u64(), r, "rotr {k}");
    }
}

#[test]
fn width_5_increment_wraps() {
    let mut z = Bin5::MAX;
    z.wrapping_inc();
    assert_eq!(z, Bin5::ZERO);
    z.wrapping_dec();
    assert_eq!(z, Bin5::MAX);
}

#[test]
fn width_100_crosses_limbs() {
    // 2^80 + 5
    let x = Bin100::from_words(&[0x1_0000, 5]);
    assert_eq!(x.significant_bits(), 81);
    assert_eq!(x.hex(), "0000100000000000000000005");
    assert_eq!(x.hex().len(), 25);

    let two = Bin100::from_u64(2);
    let (q, r) = x.div_rem(two);
    assert_eq!(q.significant_bits(), 80);
    assert_eq!(r.to_u64(), 1);
    assert_eq!(q * two + r, x);

    // Multiplication wraps modulo 2^100.
    let big = Bin100::MAX;
    assert_eq!(big * big, Bin100::ONE);
    assert_eq!(big + Bin100::ONE, Bin100::ZERO);
}

#[test]
fn width_100_decimal() {
    let x = Bin100::from_words(&[1, 0]); // 2^64
    assert_eq!(x.dec(), "18446744073709551616");
    assert_eq!(Bin100::parse_dec("18446744073709551616").unwrap(), x);
}

#[test]
fn ordering_is_unsigned() {
    let small = Bin100::from_u64(u64::MAX);
    let large = Bin100::from_words(&[1, 0]);
    assert!(small < large);
    assert!(large > small);
    assert_eq!(large.cmp(&large), std::cmp::Ordering::Equal);
}

#[test]
fn numeric_limits() {
    assert_eq!(Bin5::BITS, 5);
    assert_eq!(Bin5::RADIX, 2);
    assert_eq!(Bin5::DIGITS10, 1);
    assert_eq!(Uint128::DIGITS10, 38);
    assert_eq!(Bin5::MIN, Bin5::ZERO);
    assert_eq!(Uint256::MAX, !Uint256::ZERO);
}

#[quickcheck]
fn negation_cancels(v: u64) -> bool {
    let x = Bin35::from_u64(v);
    x + x.wrapping_neg() == Bin35::ZERO
}

#[quickcheck]
fn complement_is_max_minus(v: u64) -> bool {
    let x = Bin35::from_u64(v);
    !x == Bin35::MAX - x
}

#[quickcheck]
fn shift_round_trip(v: u64, k: u8) -> bool {
    let k = (k % 35) as u32;
    let x = Bin35::from_u64(v);
    (x << k) >> k == x & (Bin35::MAX >> k)
}

#[quickcheck]
fn hex_round_trip(hi: u64, lo: u64) -> bool {
    let x = Uint128::from_words(&[hi, lo]);
    Uint128::parse_hex(&x.hex()).unwrap() == x
}

#[quickcheck]
fn dec_round_trip(hi: u64, lo: u64) -> bool {
    let x = Bin100::from_words(&[hi, lo]);
    Bin100::parse_dec(&x.dec()).unwrap() == x
}

#[quickcheck]
fn div_rem_reconstructs(a: u64, b: u64, c: u64) -> bool {
    let x = Bin100::from_words(&[a, b]);
    let y = Bin100::from_u64(c);
    match x.checked_div_rem(y) {
        None => c == 0,
        Some((q, r)) => r < y && q * y + r == x,
    }
}
