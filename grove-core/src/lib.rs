//! Core engine for a plant-growth competition on a 2-D cell grid.
//!
//! Plants occupy cells with branch and leaf tissue, earn a light budget
//! from the columns their canopy tops, and spend it growing into adjacent
//! cells according to per-plant strategies. Plants that capture no light or
//! run out of room die and shade the board as grey husks.
//!
//! Main components:
//! - [`grid`] - The cell board and its neighbour queries.
//! - [`plant`] - Tissue markers, growth strategies, and the plant registry.
//! - [`moves`] - Legal growth move enumeration.
//! - [`engine`] - The per-tick resource and allocation phases.
//! - [`sim`] - The simulation driver and its snapshots.
//! - [`config`] - Tunable parameters and validation.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod moves;
pub mod plant;
pub mod sim;
pub mod types;
