use std::ops::Range;

use crate::{
    math::Fixed,
    renderer::{Rgba, software::Software},
    world::Texture,
};

/// Depths at or below this are drawn at full brightness.
pub const NO_FOG_DEPTH: i32 = 256;

/// Composite `src` over `dst` with alpha, darkening `src` by `depth`.
///
/// Each source channel is scaled by `256 / depth` once `depth` exceeds
/// [`NO_FOG_DEPTH`]; the result is always opaque.
#[inline]
pub fn blend_pixel(dst: &mut Rgba, src: Rgba, depth: i32) {
    let a = src >> 24;
    if a == 0xFF && depth <= NO_FOG_DEPTH {
        *dst = src;
        return;
    }
    if a == 0 {
        return;
    }
    let shade = |c: u32| {
        if depth > NO_FOG_DEPTH {
            (c << 8) / depth as u32
        } else {
            c
        }
    };
    let inv = 0xFF - a;
    let mix = |shift: u32| {
        let s = shade((src >> shift) & 0xFF);
        let d = (*dst >> shift) & 0xFF;
        ((a * s + inv * d) / 0xFF) << shift
    };
    *dst = 0xFF00_0000 | mix(16) | mix(8) | mix(0);
}

impl Software {
    /// Draw one vertical texture strip into screen column `dst_x`.
    ///
    /// * `y1..y2` is the unclipped extent in fixed-point screen rows.
    /// * The strip is textured in two passes split at the horizon, each
    ///   stepping `v` from the horizon outwards, so walls seen from any eye
    ///   height line up with the floor.
    /// * `opaque` strips skip blending while `depth` is unfogged.
    ///
    /// Returns the first row below the drawn (clipped) strip.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_sliver(
        &mut self,
        tex: &Texture,
        opaque: bool,
        sliver: Fixed,
        depth: i32,
        dst_x: usize,
        y1: Fixed,
        y2: Fixed,
    ) -> i32 {
        let dst_y = y1.to_int_ceil();
        let dst_h = y2.to_int_ceil() - dst_y;
        let tex = tex.mip_for(dst_h);
        let size = tex.size() as i32;

        let sliver = sliver.clamp(Fixed::ZERO, Fixed::from_raw(Fixed::ONE.raw() - 1));
        let src_x = (sliver * size).to_int_floor().clamp(0, size - 1);

        let view_h = self.height as i32;
        let (mut render_y, mut render_h) = (dst_y, dst_h);
        if render_y < 0 {
            render_h += render_y;
            render_y = 0;
        }
        if render_y + render_h > view_h {
            render_h = view_h - render_y;
        }
        if render_h <= 0 || dst_x >= self.width {
            return render_y + render_h;
        }

        let mid = view_h / 2;
        let f_mid = Fixed::from_int(mid);
        let f_size = Fixed::from_int(size);
        let src_mid = Fixed::mul_div(f_mid - y1, f_size, y2 - y1);
        let src_mid = Fixed::from_raw((src_mid.raw() + 128) & !0xFF);
        let end = render_y + render_h;

        // above the horizon: v counts down towards the top
        let upper = render_y..end.min(mid);
        if !upper.is_empty() {
            let dv = src_mid / (f_mid - y1);
            let v0 = src_mid - dv * (mid - upper.start);
            self.blit_column(tex, src_x, opaque, depth, dst_x, upper, v0, dv);
        }

        // below the horizon: v counts up towards the bottom
        let lower = render_y.max(mid)..end;
        if !lower.is_empty() {
            let dv = (f_size - src_mid) / (y2 - f_mid);
            let v0 = src_mid + dv * (lower.start - mid);
            self.blit_column(tex, src_x, opaque, depth, dst_x, lower, v0, dv);
        }

        end
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    fn blit_column(
        &mut self,
        tex: &Texture,
        src_x: i32,
        opaque: bool,
        depth: i32,
        dst_x: usize,
        rows: Range<i32>,
        mut v: Fixed,
        dv: Fixed,
    ) {
        let size = tex.size() as i32;
        let bits = tex.size_bits();
        let src = tex.pixels();
        let fast = opaque && depth <= NO_FOG_DEPTH;
        let w = self.width;

        for y in rows {
            let row = v.to_int_floor().clamp(0, size - 1);
            let texel = src[(src_x + (row << bits)) as usize];
            let dst = &mut self.scratch[y as usize * w + dst_x];
            if fast {
                *dst = texel;
            } else {
                blend_pixel(dst, texel, depth);
            }
            v += dv;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::software::renderer::fixtures::*;

    #[test]
    fn opaque_near_pixels_copy_through() {
        let mut px = 0xFF_11_22_33;
        blend_pixel(&mut px, 0xFF_AA_BB_CC, 0);
        assert_eq!(px, 0xFF_AA_BB_CC);
        blend_pixel(&mut px, 0xFF_00_00_00, NO_FOG_DEPTH);
        assert_eq!(px, 0xFF_00_00_00);
    }

    #[test]
    fn transparent_pixels_leave_destination() {
        let mut px = 0xFF_11_22_33;
        blend_pixel(&mut px, 0x00_FF_FF_FF, 0);
        assert_eq!(px, 0xFF_11_22_33);
        blend_pixel(&mut px, 0x00_FF_FF_FF, 700);
        assert_eq!(px, 0xFF_11_22_33);
    }

    #[test]
    fn half_alpha_averages() {
        let mut px = 0xFF_00_00_00;
        blend_pixel(&mut px, 0x80_FF_FF_FF, 0);
        // 128 * 255 / 255 = 128
        assert_eq!(px, 0xFF_80_80_80);
    }

    #[test]
    fn depth_darkens_opaque_source() {
        let mut px = 0;
        blend_pixel(&mut px, 0xFF_FF_80_40, 512);
        assert_eq!(px, 0xFF_7F_40_20);
        let mut far = 0;
        blend_pixel(&mut far, 0xFF_FF_FF_FF, 768);
        assert_eq!(far, 0xFF_55_55_55);
    }

    #[test]
    fn sliver_fills_its_extent_and_reports_bottom() {
        let bank = bank();
        let mut sw = renderer(&bank, 16, 20);
        let clear = sw.config.clear_color;
        let tex = bank.texture(bank.id("WALL").unwrap()).unwrap();

        let bottom = sw.draw_sliver(tex, true, Fixed::HALF, 0, 3, Fixed::from_int(4), Fixed::from_int(14));
        assert_eq!(bottom, 14);
        for y in 0..20 {
            let px = sw.scratch[y * 16 + 3];
            assert_eq!(px == WALL, (4..14).contains(&y), "row {y}");
        }
        assert!(sw.scratch.iter().enumerate().all(|(i, &p)| i % 16 == 3 || p == clear));
    }

    #[test]
    fn sliver_is_clipped_to_the_viewport() {
        let bank = bank();
        let mut sw = renderer(&bank, 4, 10);
        let tex = bank.texture(bank.id("WALL").unwrap()).unwrap();
        let bottom = sw.draw_sliver(tex, true, Fixed::ZERO, 0, 0, Fixed::from_int(-50), Fixed::from_int(70));
        assert_eq!(bottom, 10);
        assert!((0..10).all(|y| sw.scratch[y * 4] == WALL));
        // columns past the edge are ignored
        sw.draw_sliver(tex, true, Fixed::ZERO, 0, 9, Fixed::ZERO, Fixed::from_int(10));
    }

    #[test]
    fn sliver_steps_texture_rows_evenly() {
        let bank = bank();
        let mut sw = renderer(&bank, 1, 16);
        // 4×4 texture: row r holds colour 0xFF0000rr
        let pixels = (0..16).map(|i| 0xFF00_0000 | (i / 4)).collect();
        let tex = Texture::new("ROWS", 4, pixels).unwrap();
        sw.draw_sliver(&tex, true, Fixed::ZERO, 0, 0, Fixed::ZERO, Fixed::from_int(16));
        let rows: Vec<u32> = sw.scratch.iter().map(|p| p & 0xFF).collect();
        assert_eq!(rows, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    }
}
