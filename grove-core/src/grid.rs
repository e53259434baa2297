use glam::IVec2;

use crate::error::{Error, Result};
use crate::plant::PlantSet;
use crate::types::{EMPTY, Marker};

/// Orthogonal neighbour offsets in the fixed order down, up, right, left.
///
/// Rows grow downward, so `(0, 1)` is the cell below. The order is
/// observable: candidate moves are emitted in it before shuffling, and tests
/// pin it.
pub const NEIGHBOR_OFFSETS: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
];

/// A `width x height` board of tissue markers, stored row-major
/// (`index = y * width + x`). Row 0 is the sky, row `height - 1` the ground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Marker>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order, for snapshotting.
    pub fn cells(&self) -> &[Marker] {
        &self.cells
    }

    /// Returns `true` when `pos` lies on the board.
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Reads the cell at `pos`, failing with [`Error::OutOfBounds`] for
    /// coordinates off the board.
    pub fn get(&self, pos: IVec2) -> Result<Marker> {
        if self.contains(pos) {
            Ok(self.cells[self.index(pos)])
        } else {
            Err(self.out_of_bounds(pos))
        }
    }

    /// Overwrites the cell at `pos`. The grid does not police overwrites of
    /// occupied cells; that discipline belongs to the turn engine.
    pub fn set(&mut self, pos: IVec2, value: Marker) -> Result<()> {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells[idx] = value;
            Ok(())
        } else {
            Err(self.out_of_bounds(pos))
        }
    }

    /// Unchecked read for in-bounds scans.
    pub(crate) fn cell(&self, x: u32, y: u32) -> Marker {
        debug_assert!(x < self.width && y < self.height);
        self.cells[(y * self.width + x) as usize]
    }

    /// The in-bounds orthogonal neighbours of `pos`, in
    /// [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors4(&self, pos: IVec2) -> Vec<IVec2> {
        let mut out = Vec::with_capacity(4);
        for offset in NEIGHBOR_OFFSETS {
            let p = pos + offset;
            if self.contains(p) {
                out.push(p);
            }
        }
        out
    }

    /// The neighbours of `pos` a plant may grow into: empty cells, plus any
    /// plant's leaf cells when `ignore_leaves` is set. Branch tissue always
    /// blocks.
    pub fn empty_neighbors(&self, pos: IVec2, plants: &PlantSet, ignore_leaves: bool) -> Vec<IVec2> {
        let mut out = Vec::with_capacity(4);
        for offset in NEIGHBOR_OFFSETS {
            let p = pos + offset;
            if !self.contains(p) {
                continue;
            }
            let cell = self.cells[self.index(p)];
            if cell == EMPTY || (ignore_leaves && plants.is_leaf(cell)) {
                out.push(p);
            }
        }
        out
    }

    fn index(&self, pos: IVec2) -> usize {
        (pos.y as u32 * self.width + pos.x as u32) as usize
    }

    fn out_of_bounds(&self, pos: IVec2) -> Error {
        Error::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::{Plant, PlantSet, Strategy};

    #[test]
    fn new_grid_is_empty_and_sized() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.cells().iter().all(|&c| c == EMPTY));
    }

    #[test]
    fn get_and_set_roundtrip() {
        let mut grid = Grid::new(4, 3);
        grid.set(IVec2::new(2, 1), 5).unwrap();
        assert_eq!(grid.get(IVec2::new(2, 1)).unwrap(), 5);
        assert_eq!(grid.get(IVec2::new(1, 2)).unwrap(), EMPTY);
    }

    #[test]
    fn access_off_the_board_is_rejected() {
        let mut grid = Grid::new(4, 3);
        for pos in [
            IVec2::new(-1, 0),
            IVec2::new(0, -1),
            IVec2::new(4, 0),
            IVec2::new(0, 3),
        ] {
            assert!(matches!(grid.get(pos), Err(Error::OutOfBounds { .. })));
            assert!(matches!(grid.set(pos, 1), Err(Error::OutOfBounds { .. })));
        }
    }

    #[test]
    fn neighbors_follow_down_up_right_left_order() {
        let grid = Grid::new(5, 5);
        assert_eq!(
            grid.neighbors4(IVec2::new(2, 2)),
            vec![
                IVec2::new(2, 3),
                IVec2::new(2, 1),
                IVec2::new(3, 2),
                IVec2::new(1, 2),
            ]
        );
    }

    #[test]
    fn neighbors_clip_at_the_corner() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            grid.neighbors4(IVec2::new(0, 0)),
            vec![IVec2::new(0, 1), IVec2::new(1, 0)]
        );
    }

    #[test]
    fn empty_neighbors_exclude_occupied_cells() {
        let mut plants = PlantSet::new();
        plants.add(Plant::new(Strategy::Random, 1, 2)).unwrap();
        let mut grid = Grid::new(3, 3);
        grid.set(IVec2::new(1, 0), 1).unwrap();

        let open = grid.empty_neighbors(IVec2::new(1, 1), &plants, false);
        assert_eq!(
            open,
            vec![IVec2::new(1, 2), IVec2::new(2, 1), IVec2::new(0, 1)]
        );
    }

    #[test]
    fn empty_neighbors_admit_leaves_only_when_ignored() {
        let mut plants = PlantSet::new();
        plants.add(Plant::new(Strategy::Random, 1, 2)).unwrap();
        let mut grid = Grid::new(3, 3);
        grid.set(IVec2::new(1, 0), 2).unwrap();
        grid.set(IVec2::new(2, 1), 1).unwrap();

        let blocked = grid.empty_neighbors(IVec2::new(1, 1), &plants, false);
        assert_eq!(blocked, vec![IVec2::new(1, 2), IVec2::new(0, 1)]);

        let open = grid.empty_neighbors(IVec2::new(1, 1), &plants, true);
        assert_eq!(
            open,
            vec![IVec2::new(1, 2), IVec2::new(1, 0), IVec2::new(0, 1)]
        );
    }
}
