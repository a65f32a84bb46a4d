//! 16.16 fixed-point numbers.
//!
//! * `Fixed(raw)` encodes `raw / 65536`.
//! * Add / sub / neg wrap exactly like the `i32` they hold.
//! * `*` and `/` go through an `i64` intermediate so the fractional bits
//!   survive; `mul_div` keeps the full 64-bit product for perspective
//!   divisions (`a * b / c` with no rescale in between).

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub const FRACTION_BITS: u32 = 16;
pub const FRACTION_MASK: i32 = (1 << FRACTION_BITS) - 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRACTION_BITS);
    pub const HALF: Fixed = Fixed(1 << (FRACTION_BITS - 1));
    /// Largest representable value; doubles as the "no hit" distance.
    pub const MAX: Fixed = Fixed(i32::MAX);

    /*──────────────────────── conversions ───────────────────────*/

    #[inline(always)]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline(always)]
    pub const fn from_int(n: i32) -> Self {
        Fixed(n << FRACTION_BITS)
    }

    /// `floor(n * 65536)`; out-of-range values saturate.
    #[inline]
    pub fn from_f64(n: f64) -> Self {
        Fixed((n * (1u32 << FRACTION_BITS) as f64).floor() as i32)
    }

    #[inline]
    pub fn from_f32(n: f32) -> Self {
        Self::from_f64(n as f64)
    }

    /// Exact for every representable value.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u32 << FRACTION_BITS) as f64
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /*──────────────────────── rounding ──────────────────────────*/

    #[inline(always)]
    pub const fn to_int_floor(self) -> i32 {
        self.0 >> FRACTION_BITS
    }

    #[inline(always)]
    pub const fn to_int_round(self) -> i32 {
        self.0.wrapping_add(Self::HALF.0) >> FRACTION_BITS
    }

    #[inline(always)]
    pub const fn to_int_ceil(self) -> i32 {
        -(self.0.wrapping_neg() >> FRACTION_BITS)
    }

    #[inline(always)]
    pub const fn floor(self) -> Self {
        Fixed(self.0 & !FRACTION_MASK)
    }

    #[inline(always)]
    pub const fn ceil(self) -> Self {
        Fixed((self.0.wrapping_neg() & !FRACTION_MASK).wrapping_neg())
    }

    /// Fractional bits of `|self|`, always in `[0, 1)`.
    #[inline(always)]
    pub const fn frac(self) -> Self {
        Fixed(self.0.wrapping_abs() & FRACTION_MASK)
    }

    /*──────────────────────── arithmetic ────────────────────────*/

    /// `a * b / c` through a 64-bit intermediate, no fixed-point rescale.
    ///
    /// `c` must be non-zero.
    #[inline(always)]
    pub fn mul_div(a: Fixed, b: Fixed, c: Fixed) -> Fixed {
        Fixed((a.0 as i64 * b.0 as i64 / c.0 as i64) as i32)
    }

    #[inline(always)]
    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        Fixed(self.0.clamp(lo.0, hi.0))
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((self.0 as i64 * rhs.0 as i64) >> FRACTION_BITS) as i32)
    }
}

/// Scale by a plain integer (no fixed-point rescale).
impl Mul<i32> for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(self.0.wrapping_mul(rhs))
    }
}

/// Panics on a zero divisor, like integer division.
impl Div for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed((((self.0 as i64) << FRACTION_BITS) / rhs.0 as i64) as i32)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_f64_is_lossless() {
        for raw in [
            i32::MIN,
            -65537,
            -65536,
            -1,
            0,
            1,
            0x8000,
            0xFFFF,
            65536,
            1_234_567,
            i32::MAX,
        ] {
            let f = Fixed(raw);
            assert_eq!(Fixed::from_f64(f.to_f64()), f, "raw {raw}");
        }
        let mut raw = i32::MIN;
        while raw < i32::MAX - 7_919_993 {
            let f = Fixed(raw);
            assert_eq!(Fixed::from_f64(f.to_f64()), f);
            raw += 7_919_993;
        }
    }

    #[test]
    fn from_real_floors() {
        assert_eq!(Fixed::from_f64(1.5), Fixed(0x18000));
        assert_eq!(Fixed::from_f64(-0.5), Fixed(-0x8000));
        // one ulp below zero floors down, not toward zero
        assert_eq!(Fixed::from_f64(-1e-9), Fixed(-1));
        assert_eq!(Fixed::from_int(-3), Fixed(-3 << 16));
    }

    #[test]
    fn floor_ceil_round() {
        let a = Fixed::from_f64(2.25);
        assert_eq!(a.to_int_floor(), 2);
        assert_eq!(a.to_int_ceil(), 3);
        assert_eq!(a.to_int_round(), 2);
        assert_eq!(Fixed::from_f64(2.5).to_int_round(), 3);
        assert_eq!(Fixed::from_int(4).to_int_ceil(), 4);

        let n = Fixed::from_f64(-2.25);
        assert_eq!(n.to_int_floor(), -3);
        assert_eq!(n.to_int_ceil(), -2);
        assert_eq!(n.floor(), Fixed::from_int(-3));
        assert_eq!(n.ceil(), Fixed::from_int(-2));
        assert_eq!(a.floor(), Fixed::from_int(2));
        assert_eq!(a.ceil(), Fixed::from_int(3));
    }

    #[test]
    fn frac_is_masked_absolute_value() {
        assert_eq!(Fixed::from_f64(3.75).frac(), Fixed::from_f64(0.75));
        assert_eq!(Fixed::from_f64(-0.25).frac(), Fixed::from_f64(0.25));
        assert_eq!(Fixed::from_int(7).frac(), Fixed::ZERO);
    }

    #[test]
    fn mul_div_and_mul_div() {
        let a = Fixed::from_f64(1.5);
        let b = Fixed::from_f64(-2.0);
        assert_eq!(a * b, Fixed::from_f64(-3.0));
        assert_eq!(Fixed::from_int(3) / Fixed::from_int(4), Fixed::from_f64(0.75));
        assert_eq!(Fixed::from_f64(0.5) * 6, Fixed::from_int(3));

        // a*b/c keeps full precision: 200*200/100 would overflow a 16.16 mul
        let big = Fixed::from_int(200);
        let c = Fixed::from_int(100);
        assert_eq!(Fixed::mul_div(big, big, c), Fixed::from_int(400));
        assert_eq!(
            Fixed::mul_div(Fixed::HALF, Fixed::from_int(320), Fixed::from_int(2)),
            Fixed::from_int(80)
        );
    }

    #[test]
    fn ordering_matches_real_values() {
        assert!(Fixed::from_f64(-0.1) < Fixed::ZERO);
        assert!(Fixed::ONE < Fixed::MAX);
        assert_eq!(Fixed::ONE - Fixed::HALF, Fixed::HALF);
    }
}
