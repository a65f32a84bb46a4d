//! Fixed-point ray-casting software renderer.
//!
//! * [`math`] – 16.16 fixed point, binary angles and trig tables.
//! * [`world`] – tiles, map grid, entities, textures and the camera pose.
//! * [`renderer`] – the [`Renderer`](renderer::Renderer) trait and the
//!   column-based [`Software`](renderer::Software) backend.

pub mod math;
pub mod renderer;
pub mod world;
