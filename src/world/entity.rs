use glam::Vec3;

use crate::world::texture::TextureId;

/// Index into [`Map`](crate::world::Map)'s entity arena.
pub type EntityId = u32;

/// Anything drawn as a billboard (monsters, pickups, the player itself).
///
/// * `pos.z` is the height of the sprite base above the floor; for the
///   player it is the eye height used to seed the camera.
/// * `texture_scale` converts texels to map units (a 64-texel sprite with
///   scale `1/64` is one tile wide).
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub pos: Vec3,
    /// Heading in degrees, counter-clockwise from +X.
    pub direction: f32,
    pub texture: Option<TextureId>,
    pub texture_scale: f32,
}

impl Entity {
    pub fn new(pos: Vec3, texture: Option<TextureId>, texture_scale: f32) -> Self {
        Self {
            pos,
            direction: 0.0,
            texture,
            texture_scale,
        }
    }

    /// Invisible entity standing at `pos` and facing `direction`.
    pub fn viewer(pos: Vec3, direction: f32) -> Self {
        Self {
            pos,
            direction,
            texture: None,
            texture_scale: 1.0,
        }
    }

    /// Map cell containing the entity's origin.
    #[inline]
    pub fn tile(&self) -> (i32, i32) {
        (self.pos.x.floor() as i32, self.pos.y.floor() as i32)
    }
}
