//! Lane-wide exp/log/pow and sRGB transfer functions
//!
//! Minimax polynomials in the Cephes style: range reduction on the exponent
//! bits, then a short polynomial on the mantissa. Accuracy is a few ulp,
//! far below what an 8-bit channel can show.

use super::lane::{F32Lane, I32Lane};

/// Inputs to [`exp`] are clamped to this range.
pub const EXP_MIN: f32 = -87.0;
pub const EXP_MAX: f32 = 88.0;

const LOG2_E: f32 = std::f32::consts::LOG2_E;
// ln(2) split in a high part exactly representable with few bits and a tail
const LN2_HI: f32 = 0.693_359_375;
const LN2_LO: f32 = -2.121_944_4e-4;

const EXP_P: [f32; 6] = [
    1.987_569_1e-4,
    1.398_199_9e-3,
    8.333_452e-3,
    4.166_579_6e-2,
    1.666_666_5e-1,
    5.000_000_1e-1,
];

const LOG_P: [f32; 9] = [
    7.037_683_6e-2,
    -1.151_461e-1,
    1.167_699_9e-1,
    -1.242_014_1e-1,
    1.424_932_3e-1,
    -1.666_805_8e-1,
    2.000_071_4e-1,
    -2.499_999_4e-1,
    3.333_333e-1,
];

const SQRT_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;
const MIN_NORM_POS: f32 = f32::MIN_POSITIVE;
const EXPONENT_MASK: i32 = 0x7f80_0000;

/// e^x for x in [`EXP_MIN`, `EXP_MAX`]. Values outside are clamped first.
pub fn exp<const W: usize>(x: F32Lane<W>) -> F32Lane<W> {
    let x = x.clamp(F32Lane::splat(EXP_MIN), F32Lane::splat(EXP_MAX));

    // x = n * ln2 + r, |r| <= ln2 / 2
    let n = (x * LOG2_E + F32Lane::splat(0.5)).floor();
    let r = x - n * LN2_HI - n * LN2_LO;
    let r2 = r * r;

    let mut y = F32Lane::splat(EXP_P[0]);
    for &c in &EXP_P[1..] {
        y = y.mul_add(r, F32Lane::splat(c));
    }
    y = y.mul_add(r2, r + F32Lane::one());

    // build 2^n directly in the exponent field
    let pow2n = ((n.to_i32() + I32Lane::splat(0x7f)) << 23).cast_f32();
    y * pow2n
}

/// Natural logarithm. Non-positive inputs produce NaN.
pub fn log<const W: usize>(x: F32Lane<W>) -> F32Lane<W> {
    let invalid = x.le(F32Lane::zero());
    let x = x.max(F32Lane::splat(MIN_NORM_POS));

    let bits = x.cast_i32();
    let exponent = (bits >> 23) - I32Lane::splat(0x7f);
    // mantissa rescaled into [0.5, 1)
    let mantissa =
        (I32Lane::splat(EXPONENT_MASK).and_not(bits) | F32Lane::splat(0.5).cast_i32()).cast_f32();
    let mut e = exponent.to_f32() + F32Lane::one();

    // shift into [sqrt(1/2), sqrt(2)) for a better conditioned polynomial
    let small = mantissa.lt(F32Lane::splat(SQRT_HALF));
    let doubled = mantissa & small.cast_f32();
    let m = mantissa - F32Lane::one() + doubled;
    e = e - (F32Lane::one() & small.cast_f32());

    let m2 = m * m;
    let mut y = F32Lane::splat(LOG_P[0]);
    for &c in &LOG_P[1..] {
        y = y.mul_add(m, F32Lane::splat(c));
    }
    y = y * m * m2;
    y = y + e * LN2_LO;
    y = y - m2 * 0.5;

    let result = m + y + e * LN2_HI;
    result | invalid.cast_f32()
}

/// x^e through exp(e * log(x)). Zero or negative bases give zero.
pub fn pow<const W: usize>(x: F32Lane<W>, e: F32Lane<W>) -> F32Lane<W> {
    let positive = x.gt(F32Lane::zero());
    let value = exp(e * log(x));
    F32Lane::select(positive, value, F32Lane::zero())
}

/// x^n by repeated squaring.
pub fn powi<const W: usize>(x: F32Lane<W>, n: u32) -> F32Lane<W> {
    let mut result = F32Lane::one();
    let mut base = x;
    let mut n = n;
    while n > 0 {
        if n & 1 == 1 {
            result *= base;
        }
        base *= base;
        n >>= 1;
    }
    result
}

const SRGB_LINEAR_CUTOFF: f32 = 0.003_130_8;
const SRGB_ENCODED_CUTOFF: f32 = 0.040_45;

/// Linear light to sRGB gamma. Not clamped.
pub fn linear_to_srgb<const W: usize>(x: F32Lane<W>) -> F32Lane<W> {
    let linear_part = x.lt(F32Lane::splat(SRGB_LINEAR_CUTOFF));
    let scaled = x * 12.92;
    let curved = pow(x, F32Lane::splat(1.0 / 2.4)) * 1.055 - F32Lane::splat(0.055);
    F32Lane::select(linear_part, scaled, curved)
}

/// Inverse of [`linear_to_srgb`].
pub fn srgb_to_linear<const W: usize>(x: F32Lane<W>) -> F32Lane<W> {
    let linear_part = x.le(F32Lane::splat(SRGB_ENCODED_CUTOFF));
    let scaled = x * (1.0 / 12.92);
    let base = (x + F32Lane::splat(0.055)) * (1.0 / 1.055);
    let curved = pow(base, F32Lane::splat(2.4));
    F32Lane::select(linear_part, scaled, curved)
}
