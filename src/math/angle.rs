use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, Sub};

/// Number of discrete steps in a full turn.
pub const NUM_ANGLES: usize = 0x1_0000;
const ANGLE_MASK: i64 = NUM_ANGLES as i64 - 1;

/// Binary angle: `0..65536` maps onto `0..360°`, counter-clockwise.
///
/// Backed by a `u16`, so every value is already normalised and all
/// arithmetic wraps modulo a full turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Angle(u16);

impl Angle {
    pub const A0: Angle = Angle(0);
    pub const A90: Angle = Angle((NUM_ANGLES / 4) as u16);
    pub const A180: Angle = Angle((NUM_ANGLES / 2) as u16);
    pub const A270: Angle = Angle((NUM_ANGLES * 3 / 4) as u16);

    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Self {
        Angle(raw)
    }

    /// Fold any integer into `[0, 65536)`.
    #[inline(always)]
    pub const fn normalize(value: i64) -> Self {
        Angle((value & ANGLE_MASK) as u16)
    }

    /// Rounds to the nearest step (half-way cases round up).
    pub fn from_degrees(degrees: f32) -> Self {
        let steps = degrees * NUM_ANGLES as f32 / 360.0;
        Self::normalize((steps + 0.5).floor() as i64)
    }

    /// Truncates toward negative infinity.
    pub fn from_radians(radians: f64) -> Self {
        Self::normalize((radians * NUM_ANGLES as f64 / TAU).floor() as i64)
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Direct index into the trig tables.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_degrees(self) -> f32 {
        self.0 as f32 * 360.0 / NUM_ANGLES as f32
    }

    pub fn to_radians(self) -> f64 {
        self.0 as f64 * TAU / NUM_ANGLES as f64
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline(always)]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Angle {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Angle) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline(always)]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ignores_whole_turns() {
        for a in [0i64, 1, 255, 16_384, 32_767, 65_535] {
            for k in -5i64..=5 {
                assert_eq!(
                    Angle::normalize(k * NUM_ANGLES as i64 + a),
                    Angle::normalize(a),
                    "k={k} a={a}"
                );
            }
        }
        assert_eq!(Angle::normalize(-1), Angle::from_raw(65_535));
    }

    #[test]
    fn degrees_round_trip_on_quadrants() {
        assert_eq!(Angle::from_degrees(0.0), Angle::A0);
        assert_eq!(Angle::from_degrees(90.0), Angle::A90);
        assert_eq!(Angle::from_degrees(180.0), Angle::A180);
        assert_eq!(Angle::from_degrees(270.0), Angle::A270);
        assert_eq!(Angle::from_degrees(360.0), Angle::A0);
        assert_eq!(Angle::from_degrees(-90.0), Angle::A270);
        assert!((Angle::A90.to_degrees() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn radians_floor_into_range() {
        assert_eq!(Angle::from_radians(std::f64::consts::PI), Angle::A180);
        // a hair below zero lands on the last step, not on zero
        assert_eq!(Angle::from_radians(-1e-9), Angle::from_raw(65_535));
        assert!((Angle::A180.to_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(Angle::A270 + Angle::A180, Angle::A90);
        assert_eq!(Angle::A90 - Angle::A180, Angle::A270);
        let mut a = Angle::from_raw(65_000);
        a += Angle::from_raw(1_000);
        assert_eq!(a, Angle::from_raw(464));
    }
}
