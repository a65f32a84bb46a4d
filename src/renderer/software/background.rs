use crate::{
    math::NUM_ANGLES,
    renderer::{Rgba, software::Software},
    world::Image,
};

/// Copy `img` into `dst` with its top-left corner at `(x, y)`, clipped.
fn blit(dst: &mut [Rgba], dst_w: usize, dst_h: usize, img: &Image, x: i32, y: i32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + img.w as i32).min(dst_w as i32);
    let y1 = (y + img.h as i32).min(dst_h as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let len = (x1 - x0) as usize;
    for row in y0..y1 {
        let src = ((row - y) as usize) * img.w + (x0 - x) as usize;
        let dst_off = row as usize * dst_w + x0 as usize;
        dst[dst_off..dst_off + len].copy_from_slice(&img.pixels[src..src + len]);
    }
}

impl Software {
    /// Install (or remove) the panorama shown above the horizon.
    ///
    /// The image is rescaled to half the viewport height now and on every
    /// resize.
    pub fn set_background(&mut self, image: Option<Image>) {
        self.background_src = match image {
            Some(img) if img.is_empty() => {
                tracing::warn!("ignoring empty background image");
                None
            }
            other => other,
        };
        self.rescale_background();
    }

    pub(super) fn rescale_background(&mut self) {
        let height = self.height / 2;
        self.background = self
            .background_src
            .as_ref()
            .map(|img| img.scaled_to_height(height))
            .filter(|img| !img.is_empty());
    }

    /// Three side-by-side copies, scrolled so a full turn pans the
    /// panorama across twice its own width.
    pub fn draw_background(&mut self) {
        let Some(bg) = self.background.as_ref() else {
            return;
        };
        let span = bg.w as i64 * 2;
        let bx = (self.camera.angle.raw() as i64 * span / NUM_ANGLES as i64 - span) as i32;
        for k in 0..3 {
            blit(
                &mut self.scratch,
                self.width,
                self.height,
                bg,
                bx + k * bg.w as i32,
                0,
            );
        }
    }
}
