/// Index of a plant in a [`crate::plant::PlantSet`].
///
/// This is an index into the set's creation-ordered plant list, and is only
/// meaningful within the lifetime of a given `PlantSet` instance.
pub type PlantId = usize;

/// Integer cell value identifying one plant's tissue on the grid.
///
/// Every nonzero marker maps to exactly one (plant, tissue) pair through the
/// registry built at plant creation.
pub type Marker = u16;

/// Marker value of an unoccupied cell.
pub const EMPTY: Marker = 0;

/// Display colour as `[r, g, b]`.
pub type Rgb = [u8; 3];
