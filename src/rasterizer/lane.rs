//! Width-generic lane values
//!
//! Every value here is a group of `W` scalars that are always operated on
//! together. Callers never branch on individual elements: comparisons return
//! all-ones / all-zeros masks and masked updates go through [`I32Lane::select`]
//! or `conditional_assign`. The only ways to look inside a lane are
//! `lane(i)` and `from_array`.
//!
//! The arrays are laid out so the optimizer can map them onto SSE/AVX
//! registers; nothing in here depends on a particular target.

use glam::Vec3;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, Div, Mul, MulAssign, Neg, Shl, Shr, Sub, SubAssign,
};

/// Lane width the renderer is built with.
#[cfg(feature = "lanes-1")]
pub const LANE_WIDTH: usize = 1;
/// Lane width the renderer is built with.
#[cfg(all(feature = "lanes-4", not(feature = "lanes-1")))]
pub const LANE_WIDTH: usize = 4;
/// Lane width the renderer is built with.
#[cfg(not(any(feature = "lanes-1", feature = "lanes-4")))]
pub const LANE_WIDTH: usize = 8;

/// `W` signed 32-bit integers. Arithmetic wraps like the hardware does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I32Lane<const W: usize>([i32; W]);

/// `W` 32-bit floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F32Lane<const W: usize>([f32; W]);

/// Three float lanes forming `W` vectors in structure-of-arrays order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct V3Lane<const W: usize> {
    pub x: F32Lane<W>,
    pub y: F32Lane<W>,
    pub z: F32Lane<W>,
}

impl<const W: usize> I32Lane<W> {
    pub const WIDTH: usize = W;

    #[inline]
    pub fn splat(value: i32) -> Self {
        Self([value; W])
    }

    #[inline]
    pub fn zero() -> Self {
        Self::splat(0)
    }

    /// Build from `W` scalars, element 0 first.
    #[inline]
    pub fn from_array(values: [i32; W]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn lane(self, index: usize) -> i32 {
        self.0[index]
    }

    #[inline]
    fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }

    #[inline]
    fn zip(self, other: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }

    #[inline]
    fn mask_from(self, other: Self, f: impl Fn(i32, i32) -> bool) -> Self {
        self.zip(other, |a, b| if f(a, b) { -1 } else { 0 })
    }

    #[inline]
    pub fn is_all_zero(self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// `!self & other`, bit for bit.
    #[inline]
    pub fn and_not(self, other: Self) -> Self {
        self.zip(other, |a, b| !a & b)
    }

    #[inline]
    pub fn lt(self, other: Self) -> Self {
        self.mask_from(other, |a, b| a < b)
    }

    #[inline]
    pub fn le(self, other: Self) -> Self {
        self.mask_from(other, |a, b| a <= b)
    }

    #[inline]
    pub fn gt(self, other: Self) -> Self {
        self.mask_from(other, |a, b| a > b)
    }

    /// Bitwise `mask ? if_set : if_clear`.
    #[inline]
    pub fn select(mask: Self, if_set: Self, if_clear: Self) -> Self {
        (mask & if_set) | mask.and_not(if_clear)
    }

    /// `self = mask ? source : self`, bit for bit.
    #[inline]
    pub fn conditional_assign(&mut self, source: Self, mask: Self) {
        *self = Self::select(mask, source, *self);
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        self.zip(other, i32::min)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        self.zip(other, i32::max)
    }

    /// Numeric conversion.
    #[inline]
    pub fn to_f32(self) -> F32Lane<W> {
        F32Lane(std::array::from_fn(|i| self.0[i] as f32))
    }

    /// Reinterpret the bits as floats.
    #[inline]
    pub fn cast_f32(self) -> F32Lane<W> {
        F32Lane(std::array::from_fn(|i| f32::from_bits(self.0[i] as u32)))
    }
}

impl<const W: usize> Default for I32Lane<W> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const W: usize> Add for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_add)
    }
}

impl<const W: usize> Sub for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_sub)
    }
}

impl<const W: usize> Mul for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_mul)
    }
}

impl<const W: usize> Mul<i32> for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        self.map(|a| a.wrapping_mul(rhs))
    }
}

impl<const W: usize> Mul<I32Lane<W>> for i32 {
    type Output = I32Lane<W>;
    #[inline]
    fn mul(self, rhs: I32Lane<W>) -> I32Lane<W> {
        rhs * self
    }
}

impl<const W: usize> AddAssign for I32Lane<W> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const W: usize> SubAssign for I32Lane<W> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const W: usize> BitAnd for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a & b)
    }
}

impl<const W: usize> BitOr for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a | b)
    }
}

impl<const W: usize> Shl<u32> for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn shl(self, rhs: u32) -> Self {
        self.map(|a| a.wrapping_shl(rhs))
    }
}

/// Logical shift: zeros come in from the top.
impl<const W: usize> Shr<u32> for I32Lane<W> {
    type Output = Self;
    #[inline]
    fn shr(self, rhs: u32) -> Self {
        self.map(|a| (a as u32).wrapping_shr(rhs) as i32)
    }
}

impl<const W: usize> F32Lane<W> {
    pub const WIDTH: usize = W;

    #[inline]
    pub fn splat(value: f32) -> Self {
        Self([value; W])
    }

    #[inline]
    pub fn zero() -> Self {
        Self::splat(0.0)
    }

    #[inline]
    pub fn one() -> Self {
        Self::splat(1.0)
    }

    #[inline]
    pub fn from_array(values: [f32; W]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn lane(self, index: usize) -> f32 {
        self.0[index]
    }

    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }

    #[inline]
    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }

    #[inline]
    fn mask_from(self, other: Self, f: impl Fn(f32, f32) -> bool) -> I32Lane<W> {
        I32Lane(std::array::from_fn(|i| {
            if f(self.0[i], other.0[i]) {
                -1
            } else {
                0
            }
        }))
    }

    #[inline]
    pub fn lt(self, other: Self) -> I32Lane<W> {
        self.mask_from(other, |a, b| a < b)
    }

    #[inline]
    pub fn le(self, other: Self) -> I32Lane<W> {
        self.mask_from(other, |a, b| a <= b)
    }

    #[inline]
    pub fn gt(self, other: Self) -> I32Lane<W> {
        self.mask_from(other, |a, b| a > b)
    }

    /// Bitwise `mask ? if_set : if_clear`.
    #[inline]
    pub fn select(mask: I32Lane<W>, if_set: Self, if_clear: Self) -> Self {
        I32Lane::select(mask, if_set.cast_i32(), if_clear.cast_i32()).cast_f32()
    }

    #[inline]
    pub fn conditional_assign(&mut self, source: Self, mask: I32Lane<W>) {
        *self = Self::select(mask, source, *self);
    }

    /// `!self & other` on the raw bits.
    #[inline]
    pub fn and_not(self, other: Self) -> Self {
        self.cast_i32().and_not(other.cast_i32()).cast_f32()
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        self.zip(other, f32::min)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        self.zip(other, f32::max)
    }

    #[inline]
    pub fn clamp(self, lower: Self, upper: Self) -> Self {
        self.min(upper).max(lower)
    }

    #[inline]
    pub fn floor(self) -> Self {
        self.map(f32::floor)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        self.map(f32::sqrt)
    }

    #[inline]
    pub fn rsqrt(self) -> Self {
        self.map(|a| 1.0 / a.sqrt())
    }

    /// `self * b + c`
    #[inline]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        self * b + c
    }

    /// Numeric conversion, truncating toward zero and saturating.
    #[inline]
    pub fn to_i32(self) -> I32Lane<W> {
        I32Lane(std::array::from_fn(|i| self.0[i] as i32))
    }

    /// Reinterpret the bits as integers.
    #[inline]
    pub fn cast_i32(self) -> I32Lane<W> {
        I32Lane(std::array::from_fn(|i| self.0[i].to_bits() as i32))
    }
}

impl<const W: usize> Default for F32Lane<W> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const W: usize> Add for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl<const W: usize> Sub for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl<const W: usize> Mul for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl<const W: usize> Mul<f32> for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|a| a * rhs)
    }
}

impl<const W: usize> Div for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl<const W: usize> Neg for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

impl<const W: usize> AddAssign for F32Lane<W> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const W: usize> MulAssign for F32Lane<W> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const W: usize> BitAnd for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        (self.cast_i32() & rhs.cast_i32()).cast_f32()
    }
}

impl<const W: usize> BitOr for F32Lane<W> {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        (self.cast_i32() | rhs.cast_i32()).cast_f32()
    }
}

/// Vectors shorter than this are left alone by [`V3Lane::normalize`].
pub const NORMALIZE_THRESHOLD: f32 = 1e-7;

impl<const W: usize> V3Lane<W> {
    #[inline]
    pub fn new(x: F32Lane<W>, y: F32Lane<W>, z: F32Lane<W>) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn splat(v: Vec3) -> Self {
        Self::new(F32Lane::splat(v.x), F32Lane::splat(v.y), F32Lane::splat(v.z))
    }

    #[inline]
    pub fn zero() -> Self {
        Self::splat(Vec3::ZERO)
    }

    /// Transpose `W` vectors into lane form.
    #[inline]
    pub fn from_array(values: [Vec3; W]) -> Self {
        Self::new(
            F32Lane(std::array::from_fn(|i| values[i].x)),
            F32Lane(std::array::from_fn(|i| values[i].y)),
            F32Lane(std::array::from_fn(|i| values[i].z)),
        )
    }

    #[inline]
    pub fn lane(self, index: usize) -> Vec3 {
        Vec3::new(self.x.lane(index), self.y.lane(index), self.z.lane(index))
    }

    #[inline]
    pub fn dot(self, other: Self) -> F32Lane<W> {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn magnitude_sq(self) -> F32Lane<W> {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> F32Lane<W> {
        self.magnitude_sq().sqrt()
    }

    /// Unit-length copy. Elements whose squared length is at or below
    /// [`NORMALIZE_THRESHOLD`] keep their original value.
    #[inline]
    pub fn normalize(self) -> Self {
        let length_sq = self.magnitude_sq();
        let mask = length_sq.gt(F32Lane::splat(NORMALIZE_THRESHOLD));
        if mask.is_all_zero() {
            return self;
        }
        let scaled = self * length_sq.rsqrt();
        Self::select(mask, scaled, self)
    }

    #[inline]
    pub fn select(mask: I32Lane<W>, if_set: Self, if_clear: Self) -> Self {
        Self::new(
            F32Lane::select(mask, if_set.x, if_clear.x),
            F32Lane::select(mask, if_set.y, if_clear.y),
            F32Lane::select(mask, if_set.z, if_clear.z),
        )
    }

    #[inline]
    pub fn clamp(self, lower: F32Lane<W>, upper: F32Lane<W>) -> Self {
        Self::new(
            self.x.clamp(lower, upper),
            self.y.clamp(lower, upper),
            self.z.clamp(lower, upper),
        )
    }

    /// Apply `f` to each component lane.
    #[inline]
    pub fn map(self, f: impl Fn(F32Lane<W>) -> F32Lane<W>) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }
}

impl<const W: usize> Default for V3Lane<W> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const W: usize> Add for V3Lane<W> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<const W: usize> Sub for V3Lane<W> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Component-wise product.
impl<const W: usize> Mul for V3Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl<const W: usize> Mul<F32Lane<W>> for V3Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: F32Lane<W>) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<const W: usize> Mul<f32> for V3Lane<W> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
