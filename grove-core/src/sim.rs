//! The simulation driver: owns the state, the seeded RNG, and the frame
//! buffer.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::config::{Config, SnapshotMode};
use crate::engine::{self, SimulationState, TickReport};
use crate::error::Result;
use crate::grid::Grid;
use crate::moves::Move;
use crate::plant::PlantSet;
use crate::types::{Marker, PlantId};

/// Read-only capture of the board after one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// 1-based number of the tick this snapshot was taken after.
    pub tick: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major cell values.
    pub cells: Vec<Marker>,
    /// Per-plant liveness at capture time, indexed by [`PlantId`].
    pub alive: Vec<bool>,
    /// Moves applied during the captured tick, in application order.
    pub applied: Vec<Move>,
}

/// Runs the growth competition and accumulates snapshots for rendering.
///
/// The driver owns everything mutable: the [`SimulationState`], the seeded
/// RNG, the frame buffer, and the tick counter. A run is reproducible from
/// `(config, seed)` alone; every random draw (sowing columns, colour
/// jitter, the engine's sampling and shuffling) comes from the one RNG in a
/// fixed order.
pub struct Simulation {
    cfg: Config,
    state: SimulationState,
    rng: ChaCha8Rng,
    seed: u64,
    frames: Vec<Snapshot>,
    ticks_run: u32,
}

impl Simulation {
    /// Builds a fresh simulation from a validated config.
    ///
    /// Plants are created in fixed strategy order (random growers,
    /// branchers, leftmost, rightmost, upward) and sown into distinct
    /// random columns.
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;

        let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        log::info!("simulation seed: {seed}");

        let mut state = SimulationState {
            grid: Grid::new(cfg.width, cfg.height),
            plants: PlantSet::new(),
        };
        for (strategy, count) in cfg.strategy_counts() {
            for _ in 0..count {
                let id = state.plants.spawn(strategy)?;
                if cfg.color_jitter {
                    state.plants.get_mut(id).randomize_colors(&mut rng);
                }
            }
        }

        let columns = index::sample(&mut rng, cfg.width as usize, state.plants.len());
        for (id, column) in columns.into_iter().enumerate() {
            sow_column(&mut state, id, column as u32)?;
        }

        Ok(Self {
            cfg,
            state,
            rng,
            seed,
            frames: Vec::new(),
            ticks_run: 0,
        })
    }

    /// Runs a prepared board instead of sowing one.
    ///
    /// Grid dimensions and plant counts in `cfg` are ignored in favour of
    /// `state`; the engine tunables (`ignore_leaves`, `scaling`,
    /// `snapshots`, `seed`) apply as usual.
    pub fn with_state(cfg: Config, state: SimulationState) -> Self {
        let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("simulation seed: {seed}");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cfg,
            state,
            seed,
            frames: Vec::new(),
            ticks_run: 0,
        }
    }

    /// Advances one tick, capturing a frame when the cadence asks for one.
    pub fn step(&mut self) -> TickReport {
        let report = engine::run_tick(&mut self.state, &self.cfg, &mut self.rng);
        self.ticks_run += 1;
        log::debug!(
            "tick {}: {} moves applied, {} deaths",
            self.ticks_run,
            report.applied.len(),
            report.died.len()
        );
        if self.cfg.snapshots == SnapshotMode::EveryTick {
            self.capture(report.applied.clone());
        }
        report
    }

    /// Runs up to `num_ticks` ticks, stopping early once no plant is left
    /// alive. Under [`SnapshotMode::FinalOnly`] the single final frame is
    /// captured here.
    pub fn run(&mut self, num_ticks: u32) {
        for _ in 0..num_ticks {
            self.step();
            if !self.state.plants.any_alive() {
                log::info!("all plants dead after tick {}", self.ticks_run);
                break;
            }
        }
        if self.cfg.snapshots == SnapshotMode::FinalOnly {
            self.capture(Vec::new());
        }
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Snapshot> {
        self.frames
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks_run(&self) -> u32 {
        self.ticks_run
    }

    fn capture(&mut self, applied: Vec<Move>) {
        self.frames.push(Snapshot {
            tick: self.ticks_run,
            width: self.state.grid.width(),
            height: self.state.grid.height(),
            cells: self.state.grid.cells().to_vec(),
            alive: self.state.plants.alive_flags(),
            applied,
        });
    }
}

/// Sows one plant into `column`: branch cells in the two ground rows and a
/// leaf on top of them.
pub fn sow_column(state: &mut SimulationState, id: PlantId, column: u32) -> Result<()> {
    let plant = state.plants.get(id);
    let (branch, leaf) = (plant.branch_marker, plant.leaf_marker);
    let x = column as i32;
    let ground = state.grid.height() as i32 - 1;
    state.grid.set(IVec2::new(x, ground), branch)?;
    state.grid.set(IVec2::new(x, ground - 1), branch)?;
    state.grid.set(IVec2::new(x, ground - 2), leaf)?;
    Ok(())
}
