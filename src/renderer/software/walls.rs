use crate::{
    math::Fixed,
    renderer::software::Software,
    world::{NO_TEXTURE, TextureBank},
};

/// Projected screen offset `h · focal / dist`, clamped to `±limit` rows.
///
/// A camera pressed against a wall projects far past `i32` range.
#[inline]
fn project(h: Fixed, focal: Fixed, dist: Fixed, limit: i32) -> Fixed {
    let raw = h.raw() as i64 * focal.raw() as i64 / dist.raw() as i64;
    let limit = Fixed::from_int(limit).raw() as i64;
    Fixed::from_raw(raw.clamp(-limit, limit) as i32)
}

impl Software {
    /// Rasterise one wall strip per ray and record where its floor starts.
    pub fn draw_walls(&mut self, bank: &TextureBank) {
        let focal = Fixed::from_f32(self.focal);
        let mid = Fixed::from_int((self.height / 2) as i32);
        let cz = self.camera.z;
        let w = self.width;
        let limit = 4 * self.height as i32;

        for i in 0..w {
            let ray = self.rays[i];
            if !ray.is_hit() || ray.dist <= Fixed::ZERO {
                continue;
            }
            let bottom = mid + project(cz, focal, ray.dist, limit);
            let top = mid - project(Fixed::ONE - cz, focal, ray.dist, limit);
            if bottom <= top {
                continue;
            }
            let tex = bank.texture_or_missing(ray.texture.unwrap_or(NO_TEXTURE));
            let depth = self.depth_for(ray.dist);
            self.rays[i].floor_y = self.draw_sliver(tex, true, ray.sliver, depth, w - 1 - i, top, bottom);
        }
    }
}
