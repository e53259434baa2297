use glam::IVec2;
use image::{Rgba, RgbaImage};

use grove_core::plant::{PlantSet, Tissue};
use grove_core::sim::Snapshot;
use grove_core::types::{EMPTY, Marker, Rgb};

/// Grey overrides for tissue of plants that were dead at capture time.
const DEAD_BRANCH: Rgb = [77, 77, 77];
const DEAD_LEAF: Rgb = [153, 153, 153];
const BACKGROUND: Rgb = [0, 0, 0];

/// Rendering knobs.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Square pixel size of one cell.
    pub cell_size: u32,
    /// Lighten cells grown during the captured tick.
    pub highlight_fresh: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 6,
            highlight_fresh: true,
        }
    }
}

/// Renders one snapshot as an RGBA image of
/// `width * cell_size` by `height * cell_size` pixels.
///
/// Cell colours come from the owning plant's palette, with the grey dead
/// override for plants that were dead when the frame was captured. Cells
/// grown during the captured tick are lightened when `highlight_fresh` is
/// set, so each frame shows where growth happened.
pub fn render(snapshot: &Snapshot, plants: &PlantSet, opts: &RenderOptions) -> RgbaImage {
    let cell = opts.cell_size.max(1);
    let mut img = RgbaImage::from_pixel(
        snapshot.width * cell,
        snapshot.height * cell,
        opaque(BACKGROUND),
    );

    for y in 0..snapshot.height {
        for x in 0..snapshot.width {
            let marker = snapshot.cells[(y * snapshot.width + x) as usize];
            if marker == EMPTY {
                continue;
            }
            let Some(color) = cell_color(marker, snapshot, plants) else {
                log::warn!("frame holds unregistered marker {marker}, drawing background");
                continue;
            };
            let color = if opts.highlight_fresh && grown_this_tick(snapshot, x, y) {
                lighten(color)
            } else {
                color
            };
            fill_cell(&mut img, x, y, cell, color);
        }
    }
    img
}

fn cell_color(marker: Marker, snapshot: &Snapshot, plants: &PlantSet) -> Option<Rgb> {
    let (id, tissue) = plants.tissue_of(marker)?;
    let alive = snapshot.alive.get(id).copied().unwrap_or(false);
    Some(match (alive, tissue) {
        (false, Tissue::Branch) => DEAD_BRANCH,
        (false, Tissue::Leaf) => DEAD_LEAF,
        (true, Tissue::Branch) => plants.get(id).branch_color,
        (true, Tissue::Leaf) => plants.get(id).leaf_color,
    })
}

fn grown_this_tick(snapshot: &Snapshot, x: u32, y: u32) -> bool {
    let pos = IVec2::new(x as i32, y as i32);
    snapshot.applied.iter().any(|mv| mv.pos == pos)
}

/// Moves every channel halfway towards white.
fn lighten(color: Rgb) -> Rgb {
    let mut out = color;
    for channel in &mut out {
        *channel += (255 - *channel) / 2;
    }
    out
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

fn fill_cell(img: &mut RgbaImage, x: u32, y: u32, cell: u32, color: Rgb) {
    let px = opaque(color);
    for dy in 0..cell {
        for dx in 0..cell {
            img.put_pixel(x * cell + dx, y * cell + dy, px);
        }
    }
}
