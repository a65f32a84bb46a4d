//! Build a [`Map`] from rows of ASCII glyphs.
//!
//! Handy for tests and the demo viewer; real levels come from a loader.
//!
//! ```text
//!  #  wall            E  exit             G  generator
//!  .  floor (or ' ')  M  movable wall     @  player start (facing east)
//!  D  door, type 0    1 2 3  door types   *  sprite on a floor tile
//!  -  window, pane west-east   |  pane north-south   +  both
//! ```

use glam::Vec3;

use crate::world::entity::Entity;
use crate::world::map::{Map, MapError};
use crate::world::texture::TextureId;
use crate::world::tile::{Tile, TileKind, WindowFacing};

/// Textures handed to every glyph.
#[derive(Clone, Debug)]
pub struct TileSet {
    pub floor: TextureId,
    pub wall: TextureId,
    pub exit: TextureId,
    pub generator: TextureId,
    pub movable_wall: TextureId,
    /// Texture for `*` sprites; `None` spawns invisible entities.
    pub sprite: Option<TextureId>,
    pub sprite_scale: f32,
    /// Eye height of the player start.
    pub eye_height: f32,
}

impl TileSet {
    /// Every surface uses the same texture.
    pub fn uniform(tex: TextureId) -> Self {
        Self {
            floor: tex,
            wall: tex,
            exit: tex,
            generator: tex,
            movable_wall: tex,
            sprite: None,
            sprite_scale: 1.0,
            eye_height: 0.5,
        }
    }
}

pub fn parse_layout(rows: &[&str], set: &TileSet) -> Result<Map, MapError> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width == 0 {
        return Err(MapError::Empty);
    }

    let mut tiles = Vec::with_capacity(width * height);
    let mut player = None;
    let mut sprites = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let got = row.chars().count();
        if got != width {
            return Err(MapError::RaggedRow {
                row: y,
                got,
                expected: width,
            });
        }
        for (x, glyph) in row.chars().enumerate() {
            let centre = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
            let tile = match glyph {
                '#' => Tile::wall(set.wall),
                '.' | ' ' => Tile::floor(set.floor),
                'E' => Tile::new(TileKind::Exit, set.exit),
                'G' => Tile::new(TileKind::Generator, set.generator),
                'M' => Tile::movable_wall(set.movable_wall),
                'D' => Tile::door(0, set.floor),
                '1'..='3' => Tile::door(glyph as u8 - b'0', set.floor),
                '-' => Tile::window(WindowFacing::WEST_EAST, set.floor),
                '|' => Tile::window(WindowFacing::NORTH_SOUTH, set.floor),
                '+' => Tile::window(WindowFacing::all(), set.floor),
                '@' => {
                    player = Some(Entity::viewer(
                        centre.truncate().extend(set.eye_height),
                        0.0,
                    ));
                    Tile::floor(set.floor)
                }
                '*' => {
                    sprites.push(Entity::new(centre, set.sprite, set.sprite_scale));
                    Tile::floor(set.floor)
                }
                _ => return Err(MapError::UnknownGlyph { glyph, x, y }),
            };
            tiles.push(tile);
        }
    }

    let player = player.ok_or(MapError::NoPlayer)?;
    let mut map = Map::new(width, height, tiles, set.floor, player)?;
    for s in sprites {
        map.spawn(s);
    }
    Ok(map)
}
