use glam::IVec2;
use thiserror::Error;

use crate::types::Marker;

/// Errors raised during setup or board access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Coordinate outside the `[0, width) x [0, height)` board. There is no
    /// wraparound.
    #[error("coordinate {pos} outside {width}x{height} grid")]
    OutOfBounds {
        pos: IVec2,
        width: u32,
        height: u32,
    },

    /// A tissue marker was registered twice.
    #[error("marker {0} is already registered")]
    DuplicateMarker(Marker),

    /// Marker 0 denotes an empty cell and cannot identify tissue.
    #[error("marker 0 is reserved for empty cells")]
    ReservedMarker,

    /// Configuration rejected by [`crate::config::Config::validate`].
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
