use crate::engine::ResourceScaling;
use crate::error::{Error, Result};
use crate::plant::Strategy;
use crate::types::Marker;

/// When the driver captures grid snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotMode {
    /// One snapshot after every tick, for animation.
    #[default]
    EveryTick,
    /// A single snapshot of the final state.
    FinalOnly,
}

/// Tunable simulation parameters.
///
/// Defaults follow the classic setup: a 200x30 board, 15 ticks, ten random
/// growers and ten branchers.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub ticks: u32,
    pub random_plants: usize,
    pub branchers: usize,
    pub left_plants: usize,
    pub right_plants: usize,
    pub up_plants: usize,
    /// When set, existing leaf cells do not block growth from branch cells.
    pub ignore_leaves: bool,
    pub scaling: ResourceScaling,
    pub snapshots: SnapshotMode,
    /// Jitter each plant's colours so plants sharing a strategy stay
    /// distinguishable.
    pub color_jitter: bool,
    /// `None` draws a seed from entropy; the driver logs whichever ends up
    /// used.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 200,
            height: 30,
            ticks: 15,
            random_plants: 10,
            branchers: 10,
            left_plants: 0,
            right_plants: 0,
            up_plants: 0,
            ignore_leaves: false,
            scaling: ResourceScaling::Linear,
            snapshots: SnapshotMode::EveryTick,
            color_jitter: false,
            seed: None,
        }
    }
}

impl Config {
    /// Total number of plants across every strategy.
    pub fn plant_count(&self) -> usize {
        self.random_plants + self.branchers + self.left_plants + self.right_plants + self.up_plants
    }

    /// Per-strategy plant counts in creation order.
    pub(crate) fn strategy_counts(&self) -> [(Strategy, usize); 5] {
        [
            (Strategy::Random, self.random_plants),
            (Strategy::Brancher, self.branchers),
            (Strategy::Leftmost, self.left_plants),
            (Strategy::Rightmost, self.right_plants),
            (Strategy::Upward, self.up_plants),
        ]
    }

    /// Rejects configurations the sower cannot satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "grid dimensions must be nonzero".into(),
            ));
        }
        if self.height < 3 {
            return Err(Error::InvalidConfig(
                "height must be at least 3 to hold a seed column".into(),
            ));
        }
        let plants = self.plant_count();
        if plants == 0 {
            return Err(Error::InvalidConfig("at least one plant is required".into()));
        }
        // Each plant takes a marker pair 2k+1 / 2k+2, so the roster is
        // capped by the marker type's range.
        let max_plants = (Marker::MAX as usize - 1) / 2;
        if plants > max_plants {
            return Err(Error::InvalidConfig(format!(
                "{plants} plants exceed the {max_plants} marker pairs available"
            )));
        }
        if plants > self.width as usize {
            return Err(Error::InvalidConfig(format!(
                "{plants} plants cannot seed distinct columns on a width-{} grid",
                self.width
            )));
        }
        Ok(())
    }
}
