//! Grid walk (DDA) for one ray per screen column.
//!
//! Every ray is traced twice: once across the horizontal grid lines
//! (`y = k`, stepping by `cot`) and once across the vertical ones
//! (`x = k`, stepping by `tan`). The nearer of the two hits wins.

use crate::{
    math::{Angle, Fixed, TrigTables},
    renderer::software::{renderer::SpecialTextures, visibility::TouchedTiles, Software},
    world::{Camera, Map, TextureId, Tile, TileKind, WindowFacing},
};

/// Result of casting one ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ray {
    /// Perpendicular distance to the hit; [`Fixed::MAX`] when nothing was hit.
    pub dist: Fixed,
    /// Horizontal texel offset of the hit, in `[0, 1)`.
    pub sliver: Fixed,
    pub texture: Option<TextureId>,
    /// First screen row below the wall; the floor starts here.
    pub floor_y: i32,
}

impl Ray {
    pub const NO_HIT: Ray = Ray {
        dist: Fixed::MAX,
        sliver: Fixed::ZERO,
        texture: None,
        floor_y: 0,
    };

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::NO_HIT;
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.dist < Fixed::MAX
    }

    /// Keep `hit` only if strictly nearer; ties keep the earlier one.
    #[inline]
    fn offer(&mut self, dist: Fixed, hit: &Hit) {
        if dist < self.dist {
            self.dist = dist;
            self.sliver = hit.sliver;
            self.texture = Some(hit.texture);
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::NO_HIT
    }
}

/// Window panes are eight bars wide; odd bars are solid.
#[inline]
pub fn is_window_bar(sliver: Fixed) -> bool {
    (sliver.raw() / (Fixed::ONE.raw() >> 3)) & 1 == 1
}

/*──────────────────────── single grid walk ─────────────────────────*/

/// Which family of grid lines a walk crosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    /// Horizontal lines `y = k`.
    Rows,
    /// Vertical lines `x = k`.
    Columns,
}

impl Axis {
    #[inline]
    fn window_facing(self) -> WindowFacing {
        match self {
            Axis::Rows => WindowFacing::WEST_EAST,
            Axis::Columns => WindowFacing::NORTH_SOUTH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Hit {
    x: Fixed,
    y: Fixed,
    sliver: Fixed,
    texture: TextureId,
}

#[derive(Clone, Copy, Debug)]
struct Scan {
    axis: Axis,
    /// ±1 along the crossed axis.
    dir: i32,
    x: Fixed,
    y: Fixed,
    dx: Fixed,
    dy: Fixed,
    tile_x: i32,
    tile_y: i32,
}

impl Scan {
    fn new(axis: Axis, dir: i32, x: Fixed, y: Fixed, dx: Fixed, dy: Fixed) -> Self {
        let back = if dir < 0 { 1 } else { 0 };
        let (tile_x, tile_y) = match axis {
            Axis::Columns => (x.to_int_floor() - back, y.to_int_floor()),
            Axis::Rows => (x.to_int_floor(), y.to_int_floor() - back),
        };
        Self {
            axis,
            dir,
            x,
            y,
            dx,
            dy,
            tile_x,
            tile_y,
        }
    }

    /// Walk across `y = k` lines. `None` when the ray runs parallel to them.
    fn rows(cam: &Camera, angle: Angle, trig: &TrigTables) -> Option<Self> {
        let cot = trig.cot(angle);
        if angle > Angle::A0 && angle < Angle::A180 {
            let y = cam.y.floor();
            let x = cam.x + (cam.y - y) * cot;
            Some(Self::new(Axis::Rows, -1, x, y, cot, -Fixed::ONE))
        } else if angle > Angle::A180 {
            let y = Fixed::ONE + cam.y.floor();
            let x = cam.x + (cam.y - y) * cot;
            Some(Self::new(Axis::Rows, 1, x, y, -cot, Fixed::ONE))
        } else {
            None
        }
    }

    /// Walk across `x = k` lines. `None` when the ray runs parallel to them.
    fn columns(cam: &Camera, angle: Angle, trig: &TrigTables) -> Option<Self> {
        let tan = trig.tan(angle);
        if angle > Angle::A90 && angle < Angle::A270 {
            let x = cam.x.floor();
            let y = cam.y + (cam.x - x) * tan;
            Some(Self::new(Axis::Columns, -1, x, y, -Fixed::ONE, tan))
        } else if angle < Angle::A90 || angle > Angle::A270 {
            let x = Fixed::ONE + cam.x.floor();
            let y = cam.y + (cam.x - x) * tan;
            Some(Self::new(Axis::Columns, 1, x, y, Fixed::ONE, -tan))
        } else {
            None
        }
    }

    /// Position along the crossed grid line.
    #[inline(always)]
    fn along(&self) -> Fixed {
        match self.axis {
            Axis::Columns => self.y,
            Axis::Rows => self.x,
        }
    }

    #[inline(always)]
    fn half_step(&self) -> (Fixed, Fixed) {
        (
            Fixed::from_raw(self.dx.raw() / 2),
            Fixed::from_raw(self.dy.raw() / 2),
        )
    }

    #[inline(always)]
    fn along_of(&self, ex: Fixed, ey: Fixed) -> Fixed {
        match self.axis {
            Axis::Columns => ey,
            Axis::Rows => ex,
        }
    }

    #[inline(always)]
    fn advance(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
        match self.axis {
            Axis::Columns => {
                self.tile_x += self.dir;
                self.tile_y = self.y.to_int_floor();
            }
            Axis::Rows => {
                self.tile_x = self.x.to_int_floor();
                self.tile_y += self.dir;
            }
        }
    }

    #[inline(always)]
    fn hit(&self, sliver: Fixed, texture: TextureId) -> Hit {
        Hit {
            x: self.x,
            y: self.y,
            sliver,
            texture,
        }
    }

    /// Step until something blocks the ray or it leaves the map.
    ///
    /// Every cell passed through is recorded in `touched`.
    fn run(mut self, map: &Map, specials: &SpecialTextures, touched: &mut TouchedTiles) -> Option<Hit> {
        loop {
            let tile = *map.tile_at(self.tile_x, self.tile_y)?;
            match tile.kind {
                TileKind::Nothing => {}

                TileKind::Wall | TileKind::Exit | TileKind::Generator => {
                    let (bx, by) = match self.axis {
                        Axis::Columns => (self.tile_x - self.dir, self.tile_y),
                        Axis::Rows => (self.tile_x, self.tile_y - self.dir),
                    };
                    let texture = if map.tile_at(bx, by).is_some_and(Tile::is_door) {
                        specials.door_side
                    } else {
                        tile.texture
                    };
                    return Some(self.hit(self.along().frac(), texture));
                }

                TileKind::Door { door_type, open } => {
                    let (ex, ey) = self.half_step();
                    let sliver = (self.along().frac() + self.along_of(ex, ey))
                        .clamp(Fixed::ZERO, Fixed::from_raw(Fixed::ONE.raw() - 1));
                    if open <= sliver {
                        self.x += ex;
                        self.y += ey;
                        return Some(self.hit(sliver - open, specials.door(door_type)));
                    }
                }

                TileKind::Window { facing } if facing.contains(self.axis.window_facing()) => {
                    let (ex, ey) = self.half_step();
                    let sliver = (self.along() + self.along_of(ex, ey)).frac();
                    if is_window_bar(sliver) {
                        self.x += ex;
                        self.y += ey;
                        return Some(self.hit(sliver, specials.window));
                    }
                }
                TileKind::Window { .. } => {}

                TileKind::MovableWall { slide } => {
                    let (ex, ey) = (slide * self.dx, slide * self.dy);
                    let (shifted, cell) = match self.axis {
                        Axis::Columns => (self.y + ey, self.tile_y),
                        Axis::Rows => (self.x + ex, self.tile_x),
                    };
                    if shifted.to_int_floor() == cell {
                        self.x += ex;
                        self.y += ey;
                        return Some(self.hit(shifted.frac(), tile.texture));
                    }
                }
            }
            touched.touch(self.tile_x, self.tile_y);
            self.advance();
        }
    }
}

/// Trace one ray at absolute heading `angle` through both grid families.
pub(super) fn cast_ray(
    map: &Map,
    specials: &SpecialTextures,
    trig: &TrigTables,
    cam: &Camera,
    angle: Angle,
    touched: &mut TouchedTiles,
) -> Ray {
    let mut ray = Ray::NO_HIT;
    let scans = [Scan::rows(cam, angle, trig), Scan::columns(cam, angle, trig)];
    for scan in scans.into_iter().flatten() {
        if let Some(hit) = scan.run(map, specials, touched) {
            ray.offer(cam.forward_distance(trig, hit.x, hit.y), &hit);
        }
    }
    ray
}

impl Software {
    /// Fill `self.rays` and rebuild the touched-tile set for this frame.
    pub fn cast_rays(&mut self, map: &Map) {
        let trig = self.trig.get_or_init(TrigTables::new);
        let cam = self.camera;

        self.touched.reset(map.width(), map.height());
        let (cx, cy) = cam.tile();
        self.touched.touch(cx, cy);

        for (ray, &offset) in self.rays.iter_mut().zip(&self.ray_angles) {
            *ray = cast_ray(map, &self.specials, trig, &cam, cam.angle + offset, &mut self.touched);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
