//! ---------------------------------------------------------------------------
//! Fixed-point software (CPU) ray caster
//!
//! * Fills an `&mut [u32]` frame-buffer in **0xAARRGGBB** format.
//! * One ray per screen column walks the tile grid (DDA); walls, floors
//!   and sprites are then rasterised from the per-column ray results.
//! * Pass order is fixed: background → walls → floor → sprites. The floor
//!   pass reads the wall pass's bottom rows and the sprite pass reads the
//!   ray distances, so no Z-buffer is needed.
//!
//! Ray index `i` is shown in screen column `width - 1 - i`: angles grow
//! counter-clockwise, i.e. towards the left of the screen.
//! ---------------------------------------------------------------------------

mod background;
mod compositor;
mod planes;
mod raycast;
mod renderer;
mod sprites;
mod visibility;
mod walls;

pub use compositor::{NO_FOG_DEPTH, blend_pixel};
pub use raycast::{Ray, is_window_bar};
pub use renderer::{DEPTH_MAX, DEPTH_SCALE, MAX_FOV, MIN_FOV, Software, SpecialTextures};
pub use sprites::{VisSprite, is_sprite_visible, sort_back_to_front};
pub use visibility::{Mark, TouchedTiles};
