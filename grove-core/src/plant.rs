use std::collections::HashMap;

use rand::Rng;

use crate::error::{Error, Result};
use crate::moves::Move;
use crate::types::{EMPTY, Marker, PlantId, Rgb};

/// The two tissue kinds a plant grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tissue {
    Branch,
    Leaf,
}

impl Tissue {
    /// Resource cost of growing one cell of this tissue.
    pub fn cost(self) -> u32 {
        match self {
            Tissue::Branch => 1,
            Tissue::Leaf => 2,
        }
    }
}

/// Move-selection rule of a plant.
///
/// Given the shuffled legal-move list for one sub-turn, a strategy picks
/// exactly one move. Strategies hold no state of their own; the pick depends
/// only on the list and the RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform choice over the list.
    Random,
    /// First branch move in list order, uniform choice when none.
    Brancher,
    /// Minimum target column, first occurrence on ties.
    Leftmost,
    /// Maximum target column, first occurrence on ties.
    Rightmost,
    /// Minimum target row (row 0 is the sky), first occurrence on ties.
    Upward,
}

impl Strategy {
    /// Default branch and leaf display colours for this strategy.
    pub fn default_colors(self) -> (Rgb, Rgb) {
        match self {
            Strategy::Random => ([139, 69, 19], [0, 100, 0]),
            Strategy::Brancher => ([0, 0, 200], [0, 200, 0]),
            Strategy::Leftmost | Strategy::Rightmost => ([100, 0, 100], [100, 100, 0]),
            Strategy::Upward => ([100, 100, 0], [50, 50, 200]),
        }
    }

    /// Picks one move from a non-empty candidate list.
    ///
    /// Because the caller shuffles the list first, positional rules
    /// (first-branch, first-on-tie) resolve ties uniformly at random rather
    /// than by board position.
    ///
    /// ### Panics
    /// Panics when `moves` is empty. The turn engine never invokes a
    /// strategy without candidates; an empty list here is an internal
    /// invariant violation.
    pub fn choose_move(self, moves: &[Move], rng: &mut impl Rng) -> Move {
        assert!(!moves.is_empty(), "strategy invoked with an empty move list");
        match self {
            Strategy::Random => moves[rng.random_range(0..moves.len())],
            Strategy::Brancher => {
                for &mv in moves {
                    if mv.kind == Tissue::Branch {
                        return mv;
                    }
                }
                moves[rng.random_range(0..moves.len())]
            }
            Strategy::Leftmost => {
                let mut best = moves[0];
                for &mv in &moves[1..] {
                    if mv.pos.x < best.pos.x {
                        best = mv;
                    }
                }
                best
            }
            Strategy::Rightmost => {
                let mut best = moves[0];
                for &mv in &moves[1..] {
                    if mv.pos.x > best.pos.x {
                        best = mv;
                    }
                }
                best
            }
            Strategy::Upward => {
                let mut best = moves[0];
                for &mv in &moves[1..] {
                    if mv.pos.y < best.pos.y {
                        best = mv;
                    }
                }
                best
            }
        }
    }
}

/// One competing plant: a marker pair, display colours, a strategy, and a
/// liveness flag.
#[derive(Clone, Debug)]
pub struct Plant {
    pub branch_marker: Marker,
    pub leaf_marker: Marker,
    pub branch_color: Rgb,
    pub leaf_color: Rgb,
    pub strategy: Strategy,
    pub alive: bool,
}

impl Plant {
    /// Creates a living plant with its strategy's default colours.
    pub fn new(strategy: Strategy, branch_marker: Marker, leaf_marker: Marker) -> Self {
        let (branch_color, leaf_color) = strategy.default_colors();
        Self {
            branch_marker,
            leaf_marker,
            branch_color,
            leaf_color,
            strategy,
            alive: true,
        }
    }

    /// Brightens both colours by a random per-channel offset and
    /// renormalises to full brightness, so plants sharing a strategy stay
    /// distinguishable.
    pub fn randomize_colors(&mut self, rng: &mut impl Rng) {
        self.branch_color = jitter(self.branch_color, rng);
        self.leaf_color = jitter(self.leaf_color, rng);
    }
}

fn jitter(color: Rgb, rng: &mut impl Rng) -> Rgb {
    let base = color.iter().copied().max().unwrap_or(1).max(1) as f32;
    let mut channels = [0f32; 3];
    for (channel, &c) in channels.iter_mut().zip(&color) {
        *channel = c as f32 / base + rng.random_range(0.0..0.5);
    }
    let peak = channels.iter().fold(0.0f32, |a, &b| a.max(b)).max(f32::EPSILON);
    let mut out = [0u8; 3];
    for (byte, &channel) in out.iter_mut().zip(&channels) {
        *byte = (channel / peak * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Registry of every plant in a simulation.
///
/// Owns the plants in creation order (a [`PlantId`] is the index) and the
/// global marker table mapping each nonzero cell value back to its
/// (plant, tissue) pair. Built once at setup; markers never change
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct PlantSet {
    plants: Vec<Plant>,
    markers: HashMap<Marker, (PlantId, Tissue)>,
}

impl PlantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plant, failing fast on a reserved or duplicate marker.
    pub fn add(&mut self, plant: Plant) -> Result<PlantId> {
        if plant.branch_marker == EMPTY || plant.leaf_marker == EMPTY {
            return Err(Error::ReservedMarker);
        }
        if plant.branch_marker == plant.leaf_marker {
            return Err(Error::DuplicateMarker(plant.branch_marker));
        }
        for marker in [plant.branch_marker, plant.leaf_marker] {
            if self.markers.contains_key(&marker) {
                return Err(Error::DuplicateMarker(marker));
            }
        }
        let id = self.plants.len();
        self.markers.insert(plant.branch_marker, (id, Tissue::Branch));
        self.markers.insert(plant.leaf_marker, (id, Tissue::Leaf));
        self.plants.push(plant);
        Ok(id)
    }

    /// Creates and registers a plant on the next free marker pair: the
    /// `k`-th plant gets branch marker `2k + 1` and leaf marker `2k + 2`.
    pub fn spawn(&mut self, strategy: Strategy) -> Result<PlantId> {
        let k = self.plants.len() as Marker;
        self.add(Plant::new(strategy, 2 * k + 1, 2 * k + 2))
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn get(&self, id: PlantId) -> &Plant {
        &self.plants[id]
    }

    pub fn get_mut(&mut self, id: PlantId) -> &mut Plant {
        &mut self.plants[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plant> {
        self.plants.iter()
    }

    /// Looks a cell value up in the marker table.
    pub fn tissue_of(&self, marker: Marker) -> Option<(PlantId, Tissue)> {
        self.markers.get(&marker).copied()
    }

    /// `true` when `marker` is some plant's leaf marker.
    pub fn is_leaf(&self, marker: Marker) -> bool {
        matches!(self.tissue_of(marker), Some((_, Tissue::Leaf)))
    }

    /// `true` while at least one plant is alive.
    pub fn any_alive(&self) -> bool {
        self.plants.iter().any(|p| p.alive)
    }

    /// Liveness flags in [`PlantId`] order, for snapshots.
    pub fn alive_flags(&self) -> Vec<bool> {
        self.plants.iter().map(|p| p.alive).collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn mv(x: i32, y: i32, marker: Marker, kind: Tissue) -> Move {
        Move {
            pos: IVec2::new(x, y),
            marker,
            kind,
        }
    }

    #[test]
    fn tissue_costs() {
        assert_eq!(Tissue::Branch.cost(), 1);
        assert_eq!(Tissue::Leaf.cost(), 2);
    }

    #[test]
    fn spawn_assigns_sequential_marker_pairs() {
        let mut plants = PlantSet::new();
        let a = plants.spawn(Strategy::Random).unwrap();
        let b = plants.spawn(Strategy::Brancher).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(plants.tissue_of(1), Some((0, Tissue::Branch)));
        assert_eq!(plants.tissue_of(2), Some((0, Tissue::Leaf)));
        assert_eq!(plants.tissue_of(3), Some((1, Tissue::Branch)));
        assert_eq!(plants.tissue_of(4), Some((1, Tissue::Leaf)));
        assert_eq!(plants.tissue_of(5), None);
    }

    #[test]
    fn duplicate_markers_are_rejected() {
        let mut plants = PlantSet::new();
        plants.add(Plant::new(Strategy::Random, 1, 2)).unwrap();
        assert_eq!(
            plants.add(Plant::new(Strategy::Brancher, 2, 5)),
            Err(Error::DuplicateMarker(2))
        );
        assert_eq!(
            plants.add(Plant::new(Strategy::Brancher, 7, 7)),
            Err(Error::DuplicateMarker(7))
        );
        assert_eq!(plants.len(), 1);
    }

    #[test]
    fn marker_zero_is_reserved() {
        let mut plants = PlantSet::new();
        assert_eq!(
            plants.add(Plant::new(Strategy::Random, 0, 2)),
            Err(Error::ReservedMarker)
        );
    }

    #[test]
    fn brancher_takes_the_first_branch_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let moves = [
            mv(4, 4, 2, Tissue::Leaf),
            mv(5, 5, 1, Tissue::Branch),
            mv(1, 1, 1, Tissue::Branch),
        ];
        let pick = Strategy::Brancher.choose_move(&moves, &mut rng);
        assert_eq!(pick, moves[1]);
    }

    #[test]
    fn brancher_falls_back_to_some_listed_move() {
        let moves = [mv(4, 4, 2, Tissue::Leaf), mv(2, 2, 2, Tissue::Leaf)];
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = Strategy::Brancher.choose_move(&moves, &mut rng);
            assert!(moves.contains(&pick));
        }
    }

    #[test]
    fn random_picks_some_listed_move() {
        let moves = [
            mv(0, 0, 1, Tissue::Branch),
            mv(1, 0, 2, Tissue::Leaf),
            mv(2, 0, 1, Tissue::Branch),
        ];
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = Strategy::Random.choose_move(&moves, &mut rng);
            assert!(moves.contains(&pick));
        }
    }

    #[test]
    fn extremal_strategies_keep_the_first_best_candidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let moves = [
            mv(3, 0, 1, Tissue::Branch),
            mv(1, 2, 2, Tissue::Leaf),
            mv(1, 9, 1, Tissue::Branch),
            mv(2, 1, 2, Tissue::Leaf),
        ];
        assert_eq!(Strategy::Leftmost.choose_move(&moves, &mut rng), moves[1]);
        assert_eq!(Strategy::Rightmost.choose_move(&moves, &mut rng), moves[0]);
        assert_eq!(Strategy::Upward.choose_move(&moves, &mut rng), moves[0]);
    }

    #[test]
    fn extremal_ties_break_by_first_occurrence() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // Two candidates share the extremal column or row; the strict
        // comparison must keep the earlier one.
        let right_tie = [
            mv(5, 3, 1, Tissue::Branch),
            mv(2, 0, 2, Tissue::Leaf),
            mv(5, 7, 1, Tissue::Branch),
        ];
        assert_eq!(
            Strategy::Rightmost.choose_move(&right_tie, &mut rng),
            right_tie[0]
        );

        let left_tie = [
            mv(1, 4, 2, Tissue::Leaf),
            mv(1, 0, 1, Tissue::Branch),
            mv(3, 2, 1, Tissue::Branch),
        ];
        assert_eq!(
            Strategy::Leftmost.choose_move(&left_tie, &mut rng),
            left_tie[0]
        );

        let up_tie = [
            mv(6, 1, 1, Tissue::Branch),
            mv(0, 1, 2, Tissue::Leaf),
            mv(4, 5, 2, Tissue::Leaf),
        ];
        assert_eq!(Strategy::Upward.choose_move(&up_tie, &mut rng), up_tie[0]);
    }

    #[test]
    #[should_panic(expected = "empty move list")]
    fn choosing_from_an_empty_list_panics() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Strategy::Random.choose_move(&[], &mut rng);
    }

    #[test]
    fn color_jitter_renormalises_to_full_brightness() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..16 {
            let mut plant = Plant::new(Strategy::Random, 1, 2);
            plant.randomize_colors(&mut rng);
            assert_eq!(plant.branch_color.iter().copied().max(), Some(255));
            assert_eq!(plant.leaf_color.iter().copied().max(), Some(255));
        }
    }
}
