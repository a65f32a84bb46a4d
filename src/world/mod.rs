mod camera;
mod entity;
mod layout;
mod map;
mod texture;
mod tile;

pub use camera::Camera;

pub use entity::{Entity, EntityId};

pub use layout::{TileSet, parse_layout};

pub use map::{DOOR_TYPES, Map, MapError};

pub use texture::{Image, NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};

pub use tile::{Tile, TileKind, WindowFacing};
