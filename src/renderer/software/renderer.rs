use once_cell::sync::OnceCell;

use crate::{
    math::{Angle, Fixed, FRACTION_BITS, TrigTables},
    renderer::software::{raycast::Ray, sprites::VisSprite, visibility::TouchedTiles},
    renderer::{RenderConfig, RenderError, Renderer, Rgba},
    world::{Camera, Image, Map, TextureBank, TextureId},
};

/// Fog multiplier: one map unit of distance adds this much depth.
pub const DEPTH_SCALE: i32 = 48;
/// Depth never exceeds this, so far surfaces keep a third of their light.
pub const DEPTH_MAX: i32 = 768;

/// Horizontal field of view is `45° · w / h`, clamped into this range.
pub const MIN_FOV: f32 = 30.0;
pub const MAX_FOV: f32 = 120.0;

/// Textures the ray caster paints itself instead of reading them from tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialTextures {
    /// Door leaf, indexed by door type.
    pub doors: [TextureId; 4],
    /// Jamb drawn on walls seen through a door cell.
    pub door_side: TextureId,
    /// Bars drawn across window cells.
    pub window: TextureId,
}

impl SpecialTextures {
    pub const DOOR_NAMES: [&'static str; 4] = ["DOOR0", "DOOR1", "DOOR2", "DOOR3"];
    pub const DOOR_SIDE_NAME: &'static str = "DOORSIDE";
    pub const WINDOW_NAME: &'static str = "WINDOW";

    /// Look the special textures up by their well-known names.
    pub fn from_bank(bank: &TextureBank) -> Result<Self, RenderError> {
        let find = |name: &'static str| bank.id(name).ok_or(RenderError::MissingTexture(name));
        let mut doors = [0; 4];
        for (slot, name) in doors.iter_mut().zip(Self::DOOR_NAMES) {
            *slot = find(name)?;
        }
        Ok(Self {
            doors,
            door_side: find(Self::DOOR_SIDE_NAME)?,
            window: find(Self::WINDOW_NAME)?,
        })
    }

    #[inline]
    pub fn door(&self, door_type: u8) -> TextureId {
        self.doors[(door_type as usize).min(self.doors.len() - 1)]
    }
}

pub struct Software {
    pub scratch: Vec<Rgba>,
    /// One entry per ray index; rebuilt every frame.
    pub rays: Vec<Ray>,
    /// Ray angle relative to the view direction, per ray index.
    pub ray_angles: Vec<Angle>,
    pub touched: TouchedTiles,
    pub sprites: Vec<VisSprite>,

    pub camera: Camera,
    pub config: RenderConfig,
    pub specials: SpecialTextures,

    pub(super) trig: OnceCell<TrigTables>,
    pub(super) background_src: Option<Image>,
    pub(super) background: Option<Image>,

    pub width: usize,
    pub height: usize,
    pub focal: f32,
    pub fov: f32,
}

impl Software {
    /// Renderer with specials resolved from `bank`. Call [`Self::resize`]
    /// (or let `begin_frame` do it) before the first frame.
    pub fn new(bank: &TextureBank) -> Result<Self, RenderError> {
        Ok(Self::with_textures(SpecialTextures::from_bank(bank)?))
    }

    pub fn with_textures(specials: SpecialTextures) -> Self {
        Self {
            scratch: Vec::new(),
            rays: Vec::new(),
            ray_angles: Vec::new(),
            touched: TouchedTiles::default(),
            sprites: Vec::new(),
            camera: Camera::default(),
            config: RenderConfig::default(),
            specials,
            trig: OnceCell::new(),
            background_src: None,
            background: None,
            width: 0,
            height: 0,
            focal: 0.0,
            fov: 0.0,
        }
    }

    /// Shared trig tables, built on first use.
    #[inline]
    pub fn trig(&self) -> &TrigTables {
        self.trig.get_or_init(TrigTables::new)
    }

    /*──────────────────────── viewport ─────────────────────────*/

    /// Recompute FOV, focal length and the per-column ray angles.
    ///
    /// Deterministic: the same size always yields the same tables.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.scratch.clear();
        self.scratch.resize(width * height, self.config.clear_color);
        self.rays.clear();
        self.rays.resize(width, Ray::NO_HIT);
        self.ray_angles.clear();

        if width == 0 || height == 0 {
            self.fov = 0.0;
            self.focal = 0.0;
            self.background = None;
            return;
        }

        self.fov = (width as f32 * 45.0 / height as f32).clamp(MIN_FOV, MAX_FOV);
        self.focal = (width as f64 / (2.0 * ((self.fov as f64).to_radians() / 2.0).tan())) as f32;

        let half = (width / 2) as i64;
        let focal = self.focal as f64;
        self.ray_angles
            .extend((0..width as i64).map(|i| Angle::from_radians(((i - half) as f64).atan2(focal))));

        self.rescale_background();
        tracing::debug!(width, height, fov = self.fov, focal = self.focal, "viewport resized");
    }

    #[inline]
    pub fn focal(&self) -> f32 {
        self.focal
    }

    #[inline]
    pub fn fov_degrees(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Angle (degrees) of the ray table entry at `screen_x`, taken
    /// relative to the camera heading: `(ray_angle[x] - camera) mod 360`.
    ///
    /// Columns outside the viewport are clamped to the nearest edge.
    pub fn view_angle_at(&self, screen_x: i32) -> f32 {
        let Some(last) = self.ray_angles.len().checked_sub(1) else {
            return (Angle::A0 - self.camera.angle).to_degrees();
        };
        let x = screen_x.clamp(0, last as i32) as usize;
        (self.ray_angles[x] - self.camera.angle).to_degrees()
    }

    /*──────────────────────── state ─────────────────────────*/

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Place the camera at `(x, y)` with eye height `z`, facing `angle_degrees`.
    pub fn set_camera_at(&mut self, x: f32, y: f32, z: f32, angle_degrees: f32) {
        self.set_camera(Camera::new(x, y, z, angle_degrees));
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Validate `map` against `bank` and move the camera to its player.
    pub fn set_map(&mut self, map: &Map, bank: &TextureBank) -> Result<(), RenderError> {
        map.validate(bank)?;
        self.camera = Camera::from_entity(map.player());
        self.touched.reset(map.width(), map.height());
        tracing::info!(
            width = map.width(),
            height = map.height(),
            entities = map.entities().len(),
            "map attached"
        );
        Ok(())
    }

    pub fn set_depth_shading_enabled(&mut self, enabled: bool) {
        self.config.depth_shading = enabled;
    }

    #[inline]
    pub fn is_depth_shading_enabled(&self) -> bool {
        self.config.depth_shading
    }

    /// Fog depth for a surface `dist` away; 0 when shading is off.
    #[inline]
    pub fn depth_for(&self, dist: Fixed) -> i32 {
        if !self.config.depth_shading {
            return 0;
        }
        ((dist.raw() as i64 * DEPTH_SCALE as i64) >> FRACTION_BITS).min(DEPTH_MAX as i64) as i32
    }

    /// Draw one frame at the current size and borrow the result.
    pub fn render_frame(&mut self, map: &Map, bank: &TextureBank) -> &[Rgba] {
        let (w, h) = (self.width, self.height);
        self.begin_frame(w, h);
        self.draw_level(map, bank);
        &self.scratch
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height || self.ray_angles.len() != w {
            self.resize(w, h);
        }
        self.scratch.fill(self.config.clear_color);
        self.sprites.clear();
    }

    fn draw_level(&mut self, map: &Map, bank: &TextureBank) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        self.cast_rays(map);
        self.draw_background();
        self.draw_walls(bank);
        self.draw_floors(map, bank);
        self.collect_sprites(map);
        let drawn = self.draw_sprites(map, bank);

        tracing::trace!(
            touched = self.touched.tiles().len(),
            sprites = self.sprites.len(),
            drawn,
            "frame rasterised"
        );
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*====================================================================*/
/*                         Shared test fixtures                        */
/*====================================================================*/
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::world::{Texture, TileSet, parse_layout};

    pub const WALL: u32 = 0xFF_80_80_F0;
    pub const FLOOR: u32 = 0xFF_30_90_30;
    pub const DOOR_SIDE: u32 = 0xFF_00_FF_00;
    pub const WINDOW: u32 = 0xFF_C0_C0_C0;

    pub fn bank() -> TextureBank {
        let mut bank = TextureBank::default_with_checker();
        for (i, name) in SpecialTextures::DOOR_NAMES.iter().enumerate() {
            bank.insert(*name, Texture::solid(*name, 2, 0xFF_40_00_00 + i as u32))
                .unwrap();
        }
        bank.insert(
            SpecialTextures::DOOR_SIDE_NAME,
            Texture::solid("DOORSIDE", 2, DOOR_SIDE),
        )
        .unwrap();
        bank.insert(SpecialTextures::WINDOW_NAME, Texture::solid("WINDOW", 2, WINDOW))
            .unwrap();
        bank.insert("WALL", Texture::solid("WALL", 4, WALL).with_mipmaps())
            .unwrap();
        bank.insert("FLOOR", Texture::solid("FLOOR", 4, FLOOR).with_mipmaps())
            .unwrap();
        bank
    }

    pub fn map(rows: &[&str], bank: &TextureBank) -> Map {
        let wall = bank.id("WALL").unwrap();
        let floor = bank.id("FLOOR").unwrap();
        let set = TileSet {
            floor,
            ..TileSet::uniform(wall)
        };
        parse_layout(rows, &set).unwrap()
    }

    pub fn renderer(bank: &TextureBank, w: usize, h: usize) -> Software {
        let mut sw = Software::new(bank).unwrap();
        sw.resize(w, h);
        sw
    }

    pub const ROOM: [&str; 5] = ["#####", "#...#", "#.@.#", "#...#", "#####"];
}
