//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It hands a [`Map`] and a [`TextureBank`] to a type that implements
//! [`Renderer`] once per frame and receives the finished frame-buffer in
//! `end_frame`.
//!
//! * The only backend today is the fixed-point column ray caster in
//!   [`software`].
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use thiserror::Error;

use crate::world::{Map, MapError, TextureBank};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Host-tunable knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Darken and fog surfaces with distance.
    pub depth_shading: bool,
    /// Colour left wherever neither background nor geometry is drawn.
    pub clear_color: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth_shading: true,
            clear_color: 0xFF_20_20_20,
        }
    }
}

/// Configuration problems detected before the first frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A texture the renderer substitutes itself (doors, windows…) is absent.
    #[error("required texture `{0}` is not loaded")]
    MissingTexture(&'static str),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise the whole map as seen from the current camera.
    ///
    /// `map` and `bank` are borrowed immutably for the frame, so door and
    /// slide animation can only advance between frames.
    fn draw_level(&mut self, map: &Map, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        map: &Map,
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_level(map, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::{Ray, SpecialTextures, Software};
