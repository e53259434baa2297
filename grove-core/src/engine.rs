//! The per-tick growth engine.
//!
//! A tick walks a fixed sequence:
//! 1. [`resource_phase`] computes each plant's move budget from the light
//!    its canopy captures.
//! 2. Living plants whose budget is 0 die on the spot.
//! 3. [`allocation_phase`] spends the surviving budgets one sub-turn at a
//!    time until none remain.
//!
//! [`run_tick`] strings the three together and reports what happened. All
//! state lives in [`SimulationState`], all randomness in the caller's RNG;
//! the same state, config, and RNG state always replay the same tick.

use rand::Rng;

use crate::config::Config;
use crate::grid::Grid;
use crate::moves::{self, Move};
use crate::plant::{PlantSet, Tissue};
use crate::types::{EMPTY, PlantId};

/// Light earned by the plant owning a column's canopy surface, per column,
/// per tick. Equal to the leaf cost, so one lit column sustains one leaf of
/// growth.
pub const LIGHT_PER_COLUMN: u32 = 2;

/// Mutable simulation state operated on by the engine phases.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub grid: Grid,
    pub plants: PlantSet,
}

/// Scaling applied to a plant's raw light sum to produce its tick budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResourceScaling {
    /// Budget equals the raw sum.
    #[default]
    Linear,
    /// Budget is `floor(sqrt(2 * raw))`, damping large canopies.
    Sqrt,
}

impl ResourceScaling {
    pub fn apply(self, raw: u32) -> u32 {
        match self {
            ResourceScaling::Linear => raw,
            ResourceScaling::Sqrt => (2.0 * f64::from(raw)).sqrt() as u32,
        }
    }
}

/// What one tick did, for logging, snapshots, and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Budget per plant after scaling, before any spend.
    pub budgets: Vec<u32>,
    /// Moves applied, in application order.
    pub applied: Vec<Move>,
    /// Plants that died this tick.
    pub died: Vec<PlantId>,
}

/// Computes every plant's move budget for the coming tick.
///
/// Each column is scanned from the sky (row 0) toward the ground and the
/// scan stops at the first occupied cell, the canopy surface; everything
/// beneath it is shaded and earns nothing. When the surface cell is a leaf
/// of a living plant, that plant's raw sum gains [`LIGHT_PER_COLUMN`].
/// Branch tissue and dead plants' tissue capture no light but still shade
/// the column. Raw sums are then passed through `scaling`.
///
/// ### Parameters
/// - `grid` - Current board, read-only.
/// - `plants` - Registry used to resolve canopy markers, read-only.
/// - `scaling` - Budget scaling from the configuration.
///
/// ### Returns
/// Per-plant budgets indexed by [`PlantId`]. Dead plants always get 0.
pub fn resource_phase(grid: &Grid, plants: &PlantSet, scaling: ResourceScaling) -> Vec<u32> {
    let mut raw = vec![0u32; plants.len()];

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let cell = grid.cell(x, y);
            if cell == EMPTY {
                continue;
            }
            // First occupied cell shades the rest of the column.
            if let Some((id, Tissue::Leaf)) = plants.tissue_of(cell)
                && plants.get(id).alive
            {
                raw[id] += LIGHT_PER_COLUMN;
            }
            break;
        }
    }

    raw.into_iter().map(|sum| scaling.apply(sum)).collect()
}

/// Runs the sub-turn loop until every budget is exhausted.
///
/// Each sub-turn samples a plant with probability proportional to its
/// remaining budget (with replacement), regenerates its legal moves, lets
/// its strategy pick one, applies it, and subtracts the cost. Two special
/// cases:
///
/// - A plant with no legal moves at all dies and its budget is forced to 0.
/// - A plant whose remaining budget is exactly 1 is offered branch moves
///   only; when none remain its budget is forced to 0 but it stays alive,
///   since it had moves, just unaffordable ones.
///
/// Move lists are regenerated every sub-turn so they are never stale;
/// [`apply_move`] still re-validates the target and panics on occupied
/// cells rather than silently overwriting tissue.
pub fn allocation_phase(
    state: &mut SimulationState,
    budgets: &mut [u32],
    cfg: &Config,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    loop {
        let total: u32 = budgets.iter().sum();
        if total == 0 {
            break;
        }
        let id = sample_weighted(budgets, total, rng);

        let mut legal = moves::generate_moves(&state.grid, &state.plants, id, cfg.ignore_leaves, rng);
        if legal.is_empty() {
            kill(&mut state.plants, id, report);
            budgets[id] = 0;
            continue;
        }
        if budgets[id] == 1 {
            legal.retain(|mv| mv.kind == Tissue::Branch);
            if legal.is_empty() {
                budgets[id] = 0;
                continue;
            }
        }

        let strategy = state.plants.get(id).strategy;
        let chosen = strategy.choose_move(&legal, rng);
        apply_move(&mut state.grid, &state.plants, chosen, cfg.ignore_leaves);
        budgets[id] -= chosen.cost();
        report.applied.push(chosen);
    }
}

/// Runs one full tick and reports its budgets, moves, and deaths.
///
/// ### Parameters
/// - `state` - Board and plants, mutated by applied moves and deaths.
/// - `cfg` - Engine tunables (`ignore_leaves`, `scaling`).
/// - `rng` - The single simulation RNG. Draw order is fixed, so a seeded
///   run replays identically.
pub fn run_tick(state: &mut SimulationState, cfg: &Config, rng: &mut impl Rng) -> TickReport {
    let mut report = TickReport::default();
    let mut budgets = resource_phase(&state.grid, &state.plants, cfg.scaling);
    report.budgets = budgets.clone();

    // Death is permanent: a plant that captured no light this tick is gone
    // even if a rival's later death would have unshaded it.
    for id in 0..state.plants.len() {
        if budgets[id] == 0 {
            kill(&mut state.plants, id, &mut report);
        }
    }

    allocation_phase(state, &mut budgets, cfg, rng, &mut report);
    report
}

/// Writes a chosen move to the board after re-validating its target.
///
/// The target must still be growable: empty, or a leaf cell when
/// `ignore_leaves` is set. Anything else means a move list outlived a board
/// mutation, and the panic surfaces that bug instead of letting tissue be
/// silently overwritten.
pub fn apply_move(grid: &mut Grid, plants: &PlantSet, mv: Move, ignore_leaves: bool) {
    let current = match grid.get(mv.pos) {
        Ok(value) => value,
        Err(e) => panic!("applied move off the board: {e}"),
    };
    assert!(
        current == EMPTY || (ignore_leaves && plants.is_leaf(current)),
        "move for marker {} targets occupied cell {} (value {current})",
        mv.marker,
        mv.pos,
    );
    grid.set(mv.pos, mv.marker).expect("bounds already checked");
}

/// Samples a plant index with probability proportional to its remaining
/// budget. `total` must equal the sum of `budgets` and be nonzero.
fn sample_weighted(budgets: &[u32], total: u32, rng: &mut impl Rng) -> PlantId {
    pick_by_ticket(budgets, rng.random_range(0..total))
}

/// Maps a ticket in `0..total` to the plant owning that slice of the
/// budget mass: plant 0 owns tickets `0..budgets[0]`, plant 1 the next
/// `budgets[1]`, and so on in [`PlantId`] order.
fn pick_by_ticket(budgets: &[u32], mut ticket: u32) -> PlantId {
    for (id, &budget) in budgets.iter().enumerate() {
        if ticket < budget {
            return id;
        }
        ticket -= budget;
    }
    unreachable!("weighted sample ticket outside budget mass");
}

fn kill(plants: &mut PlantSet, id: PlantId, report: &mut TickReport) {
    let plant = plants.get_mut(id);
    if plant.alive {
        plant.alive = false;
        report.died.push(id);
        log::debug!("plant {id} died");
    }
}
