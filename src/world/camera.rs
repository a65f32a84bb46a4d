use glam::{Vec2, Vec3, vec2};

use crate::math::{Angle, Fixed, TrigTables};
use crate::world::entity::Entity;

/// Viewer pose in fixed-point map units.
///
/// * Only **yaw** is simulated – the view never tilts up/down.
/// * `z` is the eye height inside a unit-tall wall, in `[0, 1]`.
/// * Map `y` grows southward, so the forward vector is `(cos, -sin)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
}

impl Camera {
    /// Create a camera at `(x, y)` with eye height `z`, facing
    /// `direction_degrees` (0 = east, counter-clockwise).
    pub fn new(x: f32, y: f32, z: f32, direction_degrees: f32) -> Self {
        Self {
            x: Fixed::from_f32(x),
            y: Fixed::from_f32(y),
            z: Fixed::from_f32(z),
            angle: Angle::from_degrees(direction_degrees),
        }
    }

    /// Seed the pose from an entity (usually the map's player).
    pub fn from_entity(e: &Entity) -> Self {
        Self::new(e.pos.x, e.pos.y, e.pos.z, e.direction)
    }

    /// Map cell the eye is in.
    #[inline]
    pub fn tile(&self) -> (i32, i32) {
        (self.x.to_int_floor(), self.y.to_int_floor())
    }

    /// Signed distance of `(hx, hy)` along the forward axis.
    ///
    /// `(hx - x)·cos − (hy - y)·sin` with a 64-bit intermediate.
    #[inline(always)]
    pub fn forward_distance(&self, trig: &TrigTables, hx: Fixed, hy: Fixed) -> Fixed {
        let cos = trig.cos(self.angle).raw() as i64;
        let sin = trig.sin(self.angle).raw() as i64;
        let dx = (hx - self.x).raw() as i64;
        let dy = (hy - self.y).raw() as i64;
        Fixed::from_raw(((dx * cos - dy * sin) >> crate::math::FRACTION_BITS) as i32)
    }

    /*──────────────────────── float helpers ─────────────────────*/

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x.to_f32(), self.y.to_f32(), self.z.to_f32())
    }

    /// `(sin, cos)` of the heading in floating point.
    #[inline]
    pub fn sin_cos(&self) -> (f32, f32) {
        (self.angle.to_radians() as f32).sin_cos()
    }

    /// Transform an X–Y point `p` into camera‐local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let dx = p.x - self.x.to_f32();
        let dy = p.y - self.y.to_f32();
        let (s, c) = self.sin_cos();
        vec2(dx * s + dy * c, dx * c - dy * s)
    }

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.sin_cos();
        Vec2::new(c, -s)
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline]
    pub fn right(&self) -> Vec2 {
        let (s, c) = self.sin_cos();
        Vec2::new(s, c)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let d = self.forward() * forward + self.right() * side;
        self.x += Fixed::from_f32(d.x);
        self.y += Fixed::from_f32(d.y);
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta_degrees: f32) {
        self.angle += Angle::from_degrees(delta_degrees);
    }

    pub fn direction_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
