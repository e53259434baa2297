use glam::IVec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::Grid;
use crate::plant::{PlantSet, Tissue};
use crate::types::{Marker, PlantId};

/// One candidate growth action: write `marker` into the cell at `pos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub pos: IVec2,
    pub marker: Marker,
    pub kind: Tissue,
}

impl Move {
    /// Resource cost of applying this move.
    pub fn cost(self) -> u32 {
        self.kind.cost()
    }
}

/// Enumerates every legal growth move for one plant.
///
/// Each of the plant's branch cells offers one branch move and one leaf move
/// per growable neighbour (empty, or any plant's leaf cell when
/// `ignore_leaves` is set). Each leaf cell offers one leaf move per *empty*
/// neighbour: leaves sprout only leaves and never displace tissue. A target
/// reachable from several of the plant's cells appears once per reachable
/// cell; the repeats are kept and act as extra weight for uniformly sampling
/// strategies.
///
/// The list is shuffled before it is returned, so list order carries no
/// board-position bias and sequential-scan strategies inherit a uniform
/// tie-break.
pub fn generate_moves(
    grid: &Grid,
    plants: &PlantSet,
    id: PlantId,
    ignore_leaves: bool,
    rng: &mut impl Rng,
) -> Vec<Move> {
    let plant = plants.get(id);
    let mut moves = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            if cell != plant.branch_marker && cell != plant.leaf_marker {
                continue;
            }
            let pos = IVec2::new(x as i32, y as i32);
            if cell == plant.branch_marker {
                for target in grid.empty_neighbors(pos, plants, ignore_leaves) {
                    moves.push(Move {
                        pos: target,
                        marker: plant.branch_marker,
                        kind: Tissue::Branch,
                    });
                    moves.push(Move {
                        pos: target,
                        marker: plant.leaf_marker,
                        kind: Tissue::Leaf,
                    });
                }
            } else {
                for target in grid.empty_neighbors(pos, plants, false) {
                    moves.push(Move {
                        pos: target,
                        marker: plant.leaf_marker,
                        kind: Tissue::Leaf,
                    });
                }
            }
        }
    }

    moves.shuffle(rng);
    moves
}
