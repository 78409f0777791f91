//! Static field background
//!
//! Builds the line list for the field grid from the checkpoints. The cheap
//! fidelity drops the one-step lines, which are by far the most numerous, and
//! is used while a zoom gesture is in progress.

use crate::data::field::FieldConfig;
use kurbo::Point;

/// Length of a hash tick along x, in steps
const HASH_TICK_STEPS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFidelity {
    /// Every step line
    Full,
    /// Boundary, checkpoint lines and hash ticks only
    Cached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLineKind {
    Boundary,
    /// A line through an x checkpoint
    YardLine,
    /// A short tick where a y checkpoint crosses a yard line
    HashTick,
    /// A one-step line
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub kind: GridLineKind,
    pub from: Point,
    pub to: Point,
}

impl GridLine {
    fn new(kind: GridLineKind, from: Point, to: Point) -> Self {
        Self { kind, from, to }
    }
}

pub fn build_grid(field: &FieldConfig, fidelity: GridFidelity) -> Vec<GridLine> {
    let bounds = field.bounds();
    let mut lines = vec![
        GridLine::new(
            GridLineKind::Boundary,
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
        ),
        GridLine::new(
            GridLineKind::Boundary,
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
        ),
        GridLine::new(
            GridLineKind::Boundary,
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ),
        GridLine::new(
            GridLineKind::Boundary,
            Point::new(bounds.x0, bounds.y1),
            Point::new(bounds.x0, bounds.y0),
        ),
    ];

    if fidelity == GridFidelity::Full {
        let step = field.pixels_per_step;
        let columns = (bounds.width() / step).round() as usize;
        let rows = (bounds.height() / step).round() as usize;
        for column in 1..columns {
            let x = bounds.x0 + column as f64 * step;
            lines.push(GridLine::new(
                GridLineKind::Step,
                Point::new(x, bounds.y0),
                Point::new(x, bounds.y1),
            ));
        }
        for row in 1..rows {
            let y = bounds.y0 + row as f64 * step;
            lines.push(GridLine::new(
                GridLineKind::Step,
                Point::new(bounds.x0, y),
                Point::new(bounds.x1, y),
            ));
        }
    }

    for checkpoint in &field.x_checkpoints {
        let x = field
            .steps_to_px(checkpoint.steps_from_center_front as f64, 0.0)
            .x;
        lines.push(GridLine::new(
            GridLineKind::YardLine,
            Point::new(x, bounds.y0),
            Point::new(x, bounds.y1),
        ));

        for hash in field.y_checkpoints.iter().filter(|c| c.use_as_reference) {
            let y = field
                .steps_to_px(0.0, hash.steps_from_center_front as f64)
                .y;
            let half = HASH_TICK_STEPS * field.pixels_per_step / 2.0;
            lines.push(GridLine::new(
                GridLineKind::HashTick,
                Point::new(x - half, y),
                Point::new(x + half, y),
            ));
        }
    }

    lines
}
