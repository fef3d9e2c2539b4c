//! **weaving_mazes** builds rectangular mazes whose passages may tunnel under one another.
//!
//! A `Grid` pairs a fixed lattice of cells with a graph of carved passages. The `generators`
//! carve perfect mazes into it, the grid's braid, cull and delete operators reshape them and
//! `pathing` measures breadth-first distances over the result. `Builder` composes all of these
//! at random the way the driver binary uses it.

pub mod builder;
pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod metadata;
pub mod pathing;
pub mod units;
pub mod utils;
mod weave;
