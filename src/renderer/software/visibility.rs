/// Per-cell state of the touched-tile side buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Unvisited,
    /// Next to a cell some ray passed through.
    Adjacent,
    /// A ray passed through this cell.
    OnPath,
}

/// Cells a ray passed through this frame plus their 8-neighbourhood.
///
/// Sprites are only collected from these cells, so the set is rebuilt
/// every frame before anything is drawn. Each cell appears in
/// [`tiles`](Self::tiles) at most once.
#[derive(Default)]
pub struct TouchedTiles {
    width: usize,
    height: usize,
    marks: Vec<Mark>,
    tiles: Vec<(i32, i32)>,
}

impl TouchedTiles {
    /// Forget last frame's cells, resizing for a `width × height` map.
    pub fn reset(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.marks = vec![Mark::Unvisited; width * height];
        } else {
            self.marks.fill(Mark::Unvisited);
        }
        self.tiles.clear();
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Mark `(x, y)` as on a ray path and register its neighbours.
    pub fn touch(&mut self, x: i32, y: i32) {
        let Some(centre) = self.index(x, y) else {
            return;
        };
        if self.marks[centre] == Mark::OnPath {
            return;
        }
        for nx in x - 1..=x + 1 {
            for ny in y - 1..=y + 1 {
                if let Some(i) = self.index(nx, ny) {
                    if self.marks[i] == Mark::Unvisited {
                        self.marks[i] = Mark::Adjacent;
                        self.tiles.push((nx, ny));
                    }
                }
            }
        }
        self.marks[centre] = Mark::OnPath;
    }

    /// Out-of-range cells read as `Unvisited`.
    pub fn mark(&self, x: i32, y: i32) -> Mark {
        self.index(x, y).map_or(Mark::Unvisited, |i| self.marks[i])
    }

    pub fn tiles(&self) -> &[(i32, i32)] {
        &self.tiles
    }
}
