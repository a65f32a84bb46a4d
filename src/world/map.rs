//! Tile grid plus the entities standing on it.
//!
//! * `tile_at` is the only query the ray caster needs; anything outside
//!   the grid is `None` ("the void").
//! * Every cell keeps a `SmallVec` of occupants – cells rarely hold more
//!   than a handful of things, so lookups stay allocation-free.
//! * The map is read-only while a frame renders; door / slide progress is
//!   updated by the host between frames through `tile_at_mut`.

use glam::Vec3;
use smallvec::SmallVec;
use thiserror::Error;

use crate::world::entity::{Entity, EntityId};
use crate::world::texture::{TextureBank, TextureId};
use crate::world::tile::{Tile, TileKind};

type Occupants = SmallVec<[EntityId; 4]>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map must be at least 1x1")]
    Empty,

    #[error("{got} tiles supplied for a {width}x{height} map")]
    TileCount {
        width: usize,
        height: usize,
        got: usize,
    },

    #[error("tile ({x}, {y}) references unknown texture {id}")]
    TileTexture { x: usize, y: usize, id: TextureId },

    #[error("entity {entity} references unknown texture {id}")]
    EntityTexture { entity: EntityId, id: TextureId },

    #[error("default floor texture {0} is not loaded")]
    FloorTexture(TextureId),

    #[error("door at ({x}, {y}) uses door type {door_type}, only 0..4 exist")]
    DoorType { x: usize, y: usize, door_type: u8 },

    #[error("layout row {row} is {got} glyphs wide, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("unknown layout glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("layout has no player start")]
    NoPlayer,
}

/// Number of distinct door face textures.
pub const DOOR_TYPES: u8 = 4;

pub struct Map {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    occupants: Vec<Occupants>,
    entities: Vec<Entity>,
    default_floor: TextureId,
    player: EntityId,
}

impl Map {
    /// Build a map from row-major `tiles`; `player` becomes entity 0.
    pub fn new(
        width: usize,
        height: usize,
        tiles: Vec<Tile>,
        default_floor: TextureId,
        player: Entity,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if tiles.len() != width * height {
            return Err(MapError::TileCount {
                width,
                height,
                got: tiles.len(),
            });
        }
        let mut map = Self {
            width,
            height,
            tiles,
            occupants: vec![Occupants::new(); width * height],
            entities: Vec::new(),
            default_floor,
            player: 0,
        };
        map.player = map.spawn(player);
        Ok(map)
    }

    /*──────────────────────── grid queries ──────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Tile at `(x, y)`, `None` outside the grid.
    #[inline(always)]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn tile_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }

    #[inline]
    pub fn default_floor_texture(&self) -> TextureId {
        self.default_floor
    }

    /*──────────────────────── entities ──────────────────────────*/

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player(&self) -> &Entity {
        &self.entities[self.player as usize]
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id as usize)
    }

    pub fn entities(&self) -> impl ExactSizeIterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    /// Entities whose origin lies in cell `(x, y)`.
    #[inline]
    pub fn entities_at(&self, x: i32, y: i32) -> &[EntityId] {
        match self.index(x, y) {
            Some(i) => self.occupants[i].as_slice(),
            None => &[],
        }
    }

    /// Add an entity and link it into its cell (if inside the grid).
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.len() as EntityId;
        let (tx, ty) = entity.tile();
        if let Some(i) = self.index(tx, ty) {
            self.occupants[i].push(id);
        }
        self.entities.push(entity);
        id
    }

    /// Move an entity, keeping the per-cell occupant lists current.
    ///
    /// Returns `false` if `id` does not exist.
    pub fn move_entity(&mut self, id: EntityId, pos: Vec3) -> bool {
        let Some(entity) = self.entities.get(id as usize) else {
            return false;
        };
        let old = entity.tile();
        let new = (pos.x.floor() as i32, pos.y.floor() as i32);
        if old != new {
            if let Some(i) = self.index(old.0, old.1) {
                if let Some(k) = self.occupants[i].iter().position(|&e| e == id) {
                    self.occupants[i].swap_remove(k);
                }
            }
            if let Some(i) = self.index(new.0, new.1) {
                self.occupants[i].push(id);
            }
        }
        self.entities[id as usize].pos = pos;
        true
    }

    pub fn set_entity_direction(&mut self, id: EntityId, direction: f32) {
        if let Some(e) = self.entities.get_mut(id as usize) {
            e.direction = direction;
        }
    }

    /*──────────────────────── validation ────────────────────────*/

    /// Check every texture handle against `bank` before rendering starts.
    pub fn validate(&self, bank: &TextureBank) -> Result<(), MapError> {
        if !bank.contains(self.default_floor) {
            return Err(MapError::FloorTexture(self.default_floor));
        }
        for (i, tile) in self.tiles.iter().enumerate() {
            let (x, y) = (i % self.width, i / self.width);
            if !bank.contains(tile.texture) {
                return Err(MapError::TileTexture {
                    x,
                    y,
                    id: tile.texture,
                });
            }
            if let TileKind::Door { door_type, .. } = tile.kind {
                if door_type >= DOOR_TYPES {
                    return Err(MapError::DoorType { x, y, door_type });
                }
            }
        }
        for (id, e) in self.entities.iter().enumerate() {
            if let Some(tex) = e.texture {
                if !bank.contains(tex) {
                    return Err(MapError::EntityTexture {
                        entity: id as EntityId,
                        id: tex,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::texture::Texture;

    fn open_map(w: usize, h: usize) -> Map {
        let tiles = vec![Tile::floor(0); w * h];
        Map::new(w, h, tiles, 0, Entity::viewer(Vec3::new(0.5, 0.5, 0.5), 0.0)).unwrap()
    }

    #[test]
    fn out_of_bounds_is_none() {
        let map = open_map(3, 2);
        assert!(map.tile_at(0, 0).is_some());
        assert!(map.tile_at(2, 1).is_some());
        assert!(map.tile_at(3, 0).is_none());
        assert!(map.tile_at(0, 2).is_none());
        assert!(map.tile_at(-1, 0).is_none());
        assert!(map.entities_at(-1, -1).is_empty());
    }

    #[test]
    fn rejects_bad_dimensions() {
        let err = Map::new(2, 2, vec![Tile::floor(0); 3], 0, Entity::viewer(Vec3::ZERO, 0.0));
        assert!(matches!(err, Err(MapError::TileCount { got: 3, .. })));
        let err = Map::new(0, 2, vec![], 0, Entity::viewer(Vec3::ZERO, 0.0));
        assert!(matches!(err, Err(MapError::Empty)));
    }

    #[test]
    fn occupants_follow_moves() {
        let mut map = open_map(4, 4);
        assert_eq!(map.entities_at(0, 0), &[map.player_id()]);

        let imp = map.spawn(Entity::new(Vec3::new(2.5, 1.5, 0.0), None, 1.0));
        assert_eq!(map.entities_at(2, 1), &[imp]);

        assert!(map.move_entity(imp, Vec3::new(3.2, 3.9, 0.0)));
        assert!(map.entities_at(2, 1).is_empty());
        assert_eq!(map.entities_at(3, 3), &[imp]);

        // leaving the grid unlinks it
        assert!(map.move_entity(imp, Vec3::new(9.0, 9.0, 0.0)));
        assert!(map.entities_at(3, 3).is_empty());
        assert!(!map.move_entity(99, Vec3::ZERO));
    }

    #[test]
    fn validate_catches_dangling_textures() {
        let mut bank = TextureBank::default_with_checker();
        let stone = bank.insert("STONE", Texture::solid("STONE", 2, 0)).unwrap();

        let mut map = open_map(2, 2);
        assert_eq!(map.validate(&bank), Ok(()));

        *map.tile_at_mut(1, 1).unwrap() = Tile::wall(stone + 1);
        assert_eq!(
            map.validate(&bank),
            Err(MapError::TileTexture {
                x: 1,
                y: 1,
                id: stone + 1
            })
        );

        *map.tile_at_mut(1, 1).unwrap() = Tile::door(7, stone);
        assert!(matches!(map.validate(&bank), Err(MapError::DoorType { .. })));

        *map.tile_at_mut(1, 1).unwrap() = Tile::wall(stone);
        map.spawn(Entity::new(Vec3::new(0.5, 1.5, 0.0), Some(42), 1.0));
        assert!(matches!(
            map.validate(&bank),
            Err(MapError::EntityTexture { id: 42, .. })
        ));
    }
}
