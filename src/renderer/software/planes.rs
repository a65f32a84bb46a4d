use crate::{
    math::{FRACTION_BITS, FRACTION_MASK, Fixed, TrigTables},
    renderer::software::{Software, compositor::blend_pixel},
    world::{Map, Texture, TextureBank},
};

impl Software {
    /// Inverse-perspective floor fill below the horizon.
    ///
    /// Each screen row lies at one distance, so the map position is walked
    /// across the row with a constant fixed-point step. Pixels above a
    /// column's `floor_y` belong to its wall and are left alone.
    pub fn draw_floors(&mut self, map: &Map, bank: &TextureBank) {
        let (w, h) = (self.width as i32, self.height as i32);
        if w == 0 || h == 0 {
            return;
        }
        let cam = self.camera;
        let trig = self.trig.get_or_init(TrigTables::new);
        let cos = trig.cos(cam.angle).raw() as i64;
        let sin = trig.sin(cam.angle).raw() as i64;
        let focal = Fixed::from_f32(self.focal);
        let cz = cam.z.raw() as i64;

        // map offset of the row's first ray, before dividing by the row
        let tx1 = (focal * cam.z).raw() as i64;
        let ty1 = (w / 2) as i64 * cz;
        let tx_start = tx1 * cos + ty1 * sin;
        let ty_start = -tx1 * sin + ty1 * cos;
        let inc_sin = -cz * sin;
        let inc_cos = -cz * cos;

        let default_floor = map.default_floor_texture();
        let horizon = h / 2;

        for cur_y in horizon + 1..h {
            let row = (cur_y - horizon) as i64;

            let mut tx = Fixed::from_raw(((tx_start / row) >> FRACTION_BITS) as i32) + cam.x;
            let mut ty = Fixed::from_raw(((ty_start / row) >> FRACTION_BITS) as i32) + cam.y;
            let tx_inc1 = inc_sin / row;
            let ty_inc1 = inc_cos / row;
            let tx_inc = Fixed::from_raw((tx_inc1 >> FRACTION_BITS) as i32);
            let ty_inc = Fixed::from_raw((ty_inc1 >> FRACTION_BITS) as i32);
            let fx_inc = (tx_inc1 & FRACTION_MASK as i64) as i32;
            let fy_inc = (ty_inc1 & FRACTION_MASK as i64) as i32;
            let (mut fx, mut fy) = (0i32, 0i32);

            let dist = Fixed::from_raw(((cz * focal.raw() as i64 / row) >> FRACTION_BITS) as i32);
            let depth = self.depth_for(dist);
            let size = if dist <= Fixed::ZERO {
                i32::MAX
            } else {
                (focal / dist).to_int_floor()
            };

            let mut cached: Option<((i32, i32), &Texture)> = None;
            let row_base = cur_y as usize * self.width;

            for x in 0..self.width {
                if cur_y >= self.rays[x].floor_y {
                    let cell = (tx.to_int_floor(), ty.to_int_floor());
                    let tex = match cached {
                        Some((c, t)) if c == cell => t,
                        _ => {
                            let id = map
                                .tile_at(cell.0, cell.1)
                                .map_or(default_floor, |t| t.floor_texture(default_floor));
                            let t = bank.texture_or_missing(id).mip_for(size);
                            cached = Some((cell, t));
                            t
                        }
                    };
                    let bits = tex.size_bits();
                    let u = ((tx.raw() & FRACTION_MASK) << bits) >> FRACTION_BITS;
                    let v = ((ty.raw() & FRACTION_MASK) << bits) >> FRACTION_BITS;
                    let texel = tex.pixels()[(u + (v << bits)) as usize];
                    blend_pixel(&mut self.scratch[row_base + self.width - 1 - x], texel, depth);
                }

                fx += fx_inc;
                fy += fy_inc;
                tx += tx_inc + Fixed::from_raw(fx >> FRACTION_BITS);
                ty += ty_inc + Fixed::from_raw(fy >> FRACTION_BITS);
                fx &= FRACTION_MASK;
                fy &= FRACTION_MASK;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::renderer::software::renderer::fixtures::*;
    use crate::world::Camera;

    #[test]
    fn floor_fills_below_walls_only() {
        let bank = bank();
        let map = map(&ROOM, &bank);
        let mut sw = renderer(&bank, 64, 48);
        sw.set_map(&map, &bank).unwrap();
        sw.set_depth_shading_enabled(false);
        let clear = sw.config.clear_color;
        sw.cast_rays(&map);
        sw.draw_walls(&bank);
        sw.draw_floors(&map, &bank);

        for x in 0..64 {
            let floor_y = sw.rays()[63 - x].floor_y as usize;
            assert_eq!(sw.scratch[(floor_y - 1) * 64 + x], WALL, "col {x}");
            for y in floor_y..48 {
                assert_eq!(sw.scratch[y * 64 + x], FLOOR, "col {x} row {y}");
            }
            // nothing touches the top rows above the wall
            assert_eq!(sw.scratch[x], clear);
        }
    }

    #[test]
    fn floor_samples_the_tile_under_each_pixel() {
        let mut bank = bank();
        let red = bank
            .insert("RED", crate::world::Texture::solid("RED", 3, 0xFF_FF_00_00))
            .unwrap();
        let mut map = map(&["#######", "#.....#", "#@....#", "#.....#", "#######"], &bank);
        // paint the second tile ahead of the viewer red
        map.tile_at_mut(3, 2).unwrap().texture = red;

        let mut sw = renderer(&bank, 64, 48);
        sw.set_camera(Camera::new(1.5, 2.5, 0.5, 0.0));
        sw.set_depth_shading_enabled(false);
        sw.cast_rays(&map);
        sw.draw_walls(&bank);
        sw.draw_floors(&map, &bank);

        // the bottom row lands on the first tile ahead
        assert_eq!(sw.scratch[47 * 64 + 31], FLOOR);
        // rows nearer the horizon reach about two units out
        let row = 24 + (sw.focal() * 0.5 / 2.0) as usize;
        assert_eq!(sw.scratch[row * 64 + 31], 0xFF_FF_00_00);
    }
}
