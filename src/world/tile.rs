use bitflags::bitflags;

use crate::math::Fixed;
use crate::world::texture::TextureId;

bitflags! {
    /// Which crossings of a window tile show glass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowFacing: u8 {
        /// Pane runs west-east; seen when a ray crosses a row boundary.
        const WEST_EAST   = 0x01;
        /// Pane runs north-south; seen when a ray crosses a column boundary.
        const NORTH_SOUTH = 0x02;
    }
}

/// Behaviour of one map cell. Each variant carries only what it needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TileKind {
    Nothing,
    Wall,
    Exit,
    Generator,
    /// `open` ∈ [0, 1]: 0 = closed, 1 = fully slid away.
    Door { door_type: u8, open: Fixed },
    Window { facing: WindowFacing },
    /// `slide` ∈ [0, 1]: how far the block has been pushed along the ray.
    MovableWall { slide: Fixed },
}

/// One cell of the grid.
///
/// `texture` is the face texture for the solid kinds (`Wall`, `Exit`,
/// `Generator`, `MovableWall`) and the floor texture for the others.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub texture: TextureId,
}

impl Tile {
    pub fn new(kind: TileKind, texture: TextureId) -> Self {
        Self { kind, texture }
    }

    pub fn floor(texture: TextureId) -> Self {
        Self::new(TileKind::Nothing, texture)
    }

    pub fn wall(texture: TextureId) -> Self {
        Self::new(TileKind::Wall, texture)
    }

    pub fn door(door_type: u8, floor: TextureId) -> Self {
        Self::new(
            TileKind::Door {
                door_type,
                open: Fixed::ZERO,
            },
            floor,
        )
    }

    pub fn window(facing: WindowFacing, floor: TextureId) -> Self {
        Self::new(TileKind::Window { facing }, floor)
    }

    pub fn movable_wall(texture: TextureId) -> Self {
        Self::new(TileKind::MovableWall { slide: Fixed::ZERO }, texture)
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        matches!(self.kind, TileKind::Door { .. })
    }

    /// Door open fraction or movable-wall slide; 0 for everything else.
    pub fn render_state(&self) -> Fixed {
        match self.kind {
            TileKind::Door { open, .. } => open,
            TileKind::MovableWall { slide } => slide,
            _ => Fixed::ZERO,
        }
    }

    /// Update door / slide progress, clamped into [0, 1].
    ///
    /// Call between frames only. Returns `false` for kinds without state.
    pub fn set_render_state(&mut self, state: Fixed) -> bool {
        let state = state.clamp(Fixed::ZERO, Fixed::ONE);
        match &mut self.kind {
            TileKind::Door { open, .. } => *open = state,
            TileKind::MovableWall { slide } => *slide = state,
            _ => return false,
        }
        true
    }

    /// Texture drawn on the floor of this cell.
    #[inline]
    pub fn floor_texture(&self, default: TextureId) -> TextureId {
        match self.kind {
            TileKind::MovableWall { .. } => default,
            _ => self.texture,
        }
    }

    /// True for kinds that always stop movement.
    pub fn is_solid(&self) -> bool {
        match self.kind {
            TileKind::Wall | TileKind::Exit | TileKind::Generator | TileKind::Window { .. } => true,
            TileKind::MovableWall { slide } => slide < Fixed::ONE,
            TileKind::Door { open, .. } => open < Fixed::ONE,
            TileKind::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_state_only_on_doors_and_movers() {
        let mut door = Tile::door(2, 5);
        assert!(door.set_render_state(Fixed::HALF));
        assert_eq!(door.render_state(), Fixed::HALF);

        // clamped into [0, 1]
        assert!(door.set_render_state(Fixed::from_int(3)));
        assert_eq!(door.render_state(), Fixed::ONE);
        assert!(!door.is_solid());

        let mut wall = Tile::wall(1);
        assert!(!wall.set_render_state(Fixed::ONE));
        assert_eq!(wall.render_state(), Fixed::ZERO);
    }

    #[test]
    fn floor_texture_falls_back_for_movers() {
        assert_eq!(Tile::movable_wall(9).floor_texture(3), 3);
        assert_eq!(Tile::floor(7).floor_texture(3), 7);
        assert_eq!(Tile::door(0, 4).floor_texture(3), 4);
    }
}
