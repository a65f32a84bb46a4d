//! Fixed-point trigonometry tables indexed directly by [`Angle`].
//!
//! Building all four tables costs ~1 MiB and a few milliseconds, so the
//! renderer builds them once and keeps them for its whole lifetime.

use super::{Angle, Fixed, NUM_ANGLES};

pub struct TrigTables {
    cos: Box<[Fixed]>,
    sin: Box<[Fixed]>,
    tan: Box<[Fixed]>,
    cot: Box<[Fixed]>,
}

impl TrigTables {
    /// Tabulate cos / sin / tan / cot for every angle step.
    ///
    /// Singular entries (tan at 90°/270°, cot at 0°/180°) saturate to the
    /// `i32` range; the ray caster never reads them.
    pub fn new() -> Self {
        let build = |f: fn(f64) -> f64| -> Box<[Fixed]> {
            (0..NUM_ANGLES)
                .map(|i| Fixed::from_f64(f(Angle::from_raw(i as u16).to_radians())))
                .collect()
        };
        Self {
            cos: build(f64::cos),
            sin: build(f64::sin),
            tan: build(f64::tan),
            cot: build(|r| 1.0 / r.tan()),
        }
    }

    #[inline(always)]
    pub fn cos(&self, a: Angle) -> Fixed {
        self.cos[a.index()]
    }

    #[inline(always)]
    pub fn sin(&self, a: Angle) -> Fixed {
        self.sin[a.index()]
    }

    #[inline(always)]
    pub fn tan(&self, a: Angle) -> Fixed {
        self.tan[a.index()]
    }

    #[inline(always)]
    pub fn cot(&self, a: Angle) -> Fixed {
        self.cot[a.index()]
    }
}

impl Default for TrigTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_values() {
        let t = TrigTables::new();
        assert_eq!(t.cos(Angle::A0), Fixed::ONE);
        assert_eq!(t.sin(Angle::A0), Fixed::ZERO);
        assert_eq!(t.sin(Angle::A90), Fixed::ONE);
        assert_eq!(t.cos(Angle::A180), -Fixed::ONE);
        assert_eq!(t.sin(Angle::A270), -Fixed::ONE);
        assert_eq!(t.tan(Angle::A0), Fixed::ZERO);
    }

    #[test]
    fn forty_five_degrees() {
        let t = TrigTables::new();
        let a = Angle::from_degrees(45.0);
        assert!((t.tan(a).to_f64() - 1.0).abs() < 1e-4);
        assert!((t.cot(a).to_f64() - 1.0).abs() < 1e-4);
        assert!((t.cos(a).to_f64() - t.sin(a).to_f64()).abs() < 1e-4);
    }

    #[test]
    fn singular_cotangent_saturates() {
        let t = TrigTables::new();
        assert_eq!(t.cot(Angle::A0), Fixed::MAX);
    }
}
