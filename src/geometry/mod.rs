//! Field geometry: step sizes between pages and the background grid

pub mod grid;
pub mod step_size;

pub use grid::{build_grid, GridFidelity, GridLine, GridLineKind};
pub use step_size::{step_size, step_size_range, StepSize, StepSizeRange};
