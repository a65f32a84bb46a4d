use crate::{
    math::Fixed,
    renderer::software::{
        Software,
        renderer::{DEPTH_MAX, DEPTH_SCALE},
    },
    world::{EntityId, Map, TextureBank},
};

/// An entity picked up from the touched tiles this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    pub entity: EntityId,
    /// Depth along the view direction.
    pub dist: f32,
}

/// Farthest first, so nearer sprites are painted over farther ones.
/// Stable: equal depths keep collection order.
pub fn sort_back_to_front(sprites: &mut [VisSprite]) {
    sprites.sort_by(|a, b| b.dist.total_cmp(&a.dist));
}

/// A sprite column survives only if it is strictly nearer than the wall
/// drawn in that column.
#[inline]
pub fn is_sprite_visible(sprite: Fixed, wall: Fixed) -> bool {
    sprite < wall
}

impl Software {
    /// Gather every non-player entity standing on a touched tile.
    pub fn collect_sprites(&mut self, map: &Map) {
        self.sprites.clear();
        let player = map.player_id();
        for &(x, y) in self.touched.tiles() {
            for &id in map.entities_at(x, y) {
                if id == player {
                    continue;
                }
                if let Some(e) = map.entity(id) {
                    let dist = self.camera.to_cam(e.pos.truncate()).y;
                    self.sprites.push(VisSprite { entity: id, dist });
                }
            }
        }
        sort_back_to_front(&mut self.sprites);
    }

    /// Billboard every collected sprite, column by column, occluded by the
    /// ray distances. Returns the number of sprites that reached the screen.
    pub fn draw_sprites(&mut self, map: &Map, bank: &TextureBank) -> usize {
        let sprites = std::mem::take(&mut self.sprites);
        let view_w = self.width as i32;
        let view_h = self.height as i32;
        let focal = self.focal;
        let cam = self.camera;
        let cz = cam.z.to_f32();
        let mut drawn = 0;

        for vs in &sprites {
            let dist = vs.dist;
            if dist <= 0.0 {
                continue;
            }
            let Some(e) = map.entity(vs.entity) else {
                continue;
            };
            let Some(tex_id) = e.texture else {
                continue;
            };
            let tex = bank.texture_or_missing(tex_id);

            let lateral = cam.to_cam(e.pos.truncate()).x;
            let w = tex.size() as f32 * e.texture_scale;
            let h = tex.size() as f32 * e.texture_scale;
            let render_w = focal * w / dist;
            let render_h = focal * h / dist;
            if render_w > (view_w * 4) as f32 {
                continue;
            }

            let render_y = (view_h / 2) as f32 - render_h * (1.0 - cz) - e.pos.z * focal / dist
                + cz * (focal * (1.0 - h) / dist);
            let render_x = focal * lateral / dist + (view_w as f32 - render_w - 1.0) / 2.0;

            let f_render_w = Fixed::from_f32(render_w);
            let f_render_x = Fixed::from_f32(render_x);
            let f_render_y = Fixed::from_f32(render_y);
            let f_render_h = Fixed::from_f32(render_h);
            let f_dist = Fixed::from_f32(dist);

            let x1 = f_render_x.to_int_ceil();
            let x2 = view_w.min(x1 + f_render_w.to_int_floor());
            let depth = if self.config.depth_shading {
                ((dist * DEPTH_SCALE as f32) as i32).min(DEPTH_MAX)
            } else {
                0
            };

            let mut any = false;
            for x in x1.max(0)..x2 {
                let wall = self.rays[(view_w - 1 - x) as usize].dist;
                if !is_sprite_visible(f_dist, wall) {
                    continue;
                }
                let sliver = (Fixed::from_int(x) - f_render_x) / f_render_w;
                self.draw_sliver(
                    tex,
                    false,
                    sliver,
                    depth,
                    x as usize,
                    f_render_y,
                    f_render_y + f_render_h,
                );
                any = true;
            }
            if any {
                drawn += 1;
            }
        }

        self.sprites = sprites;
        drawn
    }
}
