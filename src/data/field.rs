//! Field configuration
//!
//! The field is described by its scale (`pixels_per_step`) and two ordered
//! lists of checkpoints: yard lines along x and sidelines/hashes along y.
//! Checkpoint offsets are whole steps measured from the center of the front
//! sideline; x grows to the right (side 2), y grows toward the audience.
//! Field pixels put the origin at the back-left corner with y pointing down,
//! matching screen space.

use crate::core::errors::{AppResult, DrillContext, DrillError, DrillResult};
use crate::core::settings::DEFAULT_PIXELS_PER_STEP;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named reference line on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    /// Short name used in coordinate readouts, e.g. "FH" for front hash
    pub terse_name: String,
    /// Whole steps from the center of the front sideline
    pub steps_from_center_front: i32,
    /// Whether coordinate readouts measure from this checkpoint
    pub use_as_reference: bool,
}

impl Checkpoint {
    fn new(name: &str, terse_name: &str, steps: i32, reference: bool) -> Self {
        Self {
            name: name.to_string(),
            terse_name: terse_name.to_string(),
            steps_from_center_front: steps,
            use_as_reference: reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub pixels_per_step: f64,
    /// Ordered left to right
    pub x_checkpoints: Vec<Checkpoint>,
    /// Ordered back to front
    pub y_checkpoints: Vec<Checkpoint>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::high_school_football()
    }
}

impl FieldConfig {
    /// A 100 yard high school football field at 8 steps per 5 yards
    pub fn high_school_football() -> Self {
        let mut x_checkpoints = Vec::new();
        for index in 0..=20i32 {
            let steps = (index - 10) * 8;
            let yard_line = 50 - (index - 10).abs() * 5;
            let side = match steps.signum() {
                -1 => "S1 ",
                1 => "S2 ",
                _ => "",
            };
            x_checkpoints.push(Checkpoint::new(
                &format!("{side}{yard_line} yard line"),
                &yard_line.to_string(),
                steps,
                true,
            ));
        }

        let y_checkpoints = vec![
            Checkpoint::new("back sideline", "BSL", -85, false),
            Checkpoint::new("HS back hash", "BH", -53, true),
            Checkpoint::new("HS front hash", "FH", -32, true),
            Checkpoint::new("front sideline", "FSL", 0, false),
        ];

        Self {
            name: "High school football field".to_string(),
            pixels_per_step: DEFAULT_PIXELS_PER_STEP,
            x_checkpoints,
            y_checkpoints,
        }
    }

    /// Loads a field from a JSON file and validates it
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_file_context("read", path)?;
        let field: FieldConfig =
            serde_json::from_str(&text).with_file_context("parse", path)?;
        field.validate()?;
        Ok(field)
    }

    pub fn validate(&self) -> DrillResult<()> {
        if !(self.pixels_per_step.is_finite() && self.pixels_per_step > 0.0) {
            return Err(DrillError::Config(format!(
                "pixels_per_step must be positive, got {}",
                self.pixels_per_step
            )));
        }
        if self.x_checkpoints.is_empty() || self.y_checkpoints.is_empty() {
            return Err(DrillError::Config(
                "field needs at least one checkpoint on each axis".to_string(),
            ));
        }
        let ordered = |checkpoints: &[Checkpoint]| {
            checkpoints.windows(2).all(|pair| {
                pair[0].steps_from_center_front < pair[1].steps_from_center_front
            })
        };
        if !ordered(&self.x_checkpoints) || !ordered(&self.y_checkpoints) {
            return Err(DrillError::Config(
                "checkpoints must be strictly ordered".to_string(),
            ));
        }
        Ok(())
    }

    fn min_steps(checkpoints: &[Checkpoint]) -> i32 {
        checkpoints
            .first()
            .map(|c| c.steps_from_center_front)
            .unwrap_or(0)
    }

    fn max_steps(checkpoints: &[Checkpoint]) -> i32 {
        checkpoints
            .last()
            .map(|c| c.steps_from_center_front)
            .unwrap_or(0)
    }

    /// Field pixel location of the center of the front sideline
    pub fn center_front(&self) -> Point {
        Point::new(
            -Self::min_steps(&self.x_checkpoints) as f64 * self.pixels_per_step,
            -Self::min_steps(&self.y_checkpoints) as f64 * self.pixels_per_step,
        )
    }

    pub fn width_px(&self) -> f64 {
        (Self::max_steps(&self.x_checkpoints) - Self::min_steps(&self.x_checkpoints))
            as f64
            * self.pixels_per_step
    }

    pub fn height_px(&self) -> f64 {
        (Self::max_steps(&self.y_checkpoints) - Self::min_steps(&self.y_checkpoints))
            as f64
            * self.pixels_per_step
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_px(), self.height_px())
    }

    /// Field pixels for an offset in steps from center front
    pub fn steps_to_px(&self, x_steps: f64, y_steps: f64) -> Point {
        let origin = self.center_front();
        Point::new(
            origin.x + x_steps * self.pixels_per_step,
            origin.y + y_steps * self.pixels_per_step,
        )
    }

    /// Offset in steps from center front for a field pixel location
    pub fn px_to_steps(&self, point: Point) -> (f64, f64) {
        let origin = self.center_front();
        (
            (point.x - origin.x) / self.pixels_per_step,
            (point.y - origin.y) / self.pixels_per_step,
        )
    }

    /// Rounds a location to the nearest whole step on the unlocked axes
    pub fn snap_to_whole_step(&self, point: Point, lock_x: bool, lock_y: bool) -> Point {
        let (x_steps, y_steps) = self.px_to_steps(point);
        let snapped = self.steps_to_px(x_steps.round(), y_steps.round());
        Point::new(
            if lock_x { point.x } else { snapped.x },
            if lock_y { point.y } else { snapped.y },
        )
    }

    /// Human readable coordinate, e.g. "2.0 steps outside S1 45 yard line"
    pub fn describe_x(&self, x: f64) -> String {
        let (steps, _) = self.px_to_steps(Point::new(x, 0.0));
        match nearest_reference(&self.x_checkpoints, steps) {
            Some((checkpoint, delta)) if delta.abs() < 0.05 => {
                format!("On {}", checkpoint.name)
            }
            Some((checkpoint, delta)) => {
                let outside = (delta < 0.0) == (checkpoint.steps_from_center_front <= 0);
                format!(
                    "{:.1} steps {} {}",
                    delta.abs(),
                    if outside { "outside" } else { "inside" },
                    checkpoint.name
                )
            }
            None => format!("{steps:.1} steps"),
        }
    }

    /// Human readable coordinate, e.g. "4.0 steps in front of FH"
    pub fn describe_y(&self, y: f64) -> String {
        let (_, steps) = self.px_to_steps(Point::new(0.0, y));
        match nearest_reference(&self.y_checkpoints, steps) {
            Some((checkpoint, delta)) if delta.abs() < 0.05 => {
                format!("On {}", checkpoint.terse_name)
            }
            Some((checkpoint, delta)) => format!(
                "{:.1} steps {} {}",
                delta.abs(),
                if delta > 0.0 { "in front of" } else { "behind" },
                checkpoint.terse_name
            ),
            None => format!("{steps:.1} steps"),
        }
    }
}

/// The reference checkpoint closest to `steps`, with the signed distance
fn nearest_reference(checkpoints: &[Checkpoint], steps: f64) -> Option<(&Checkpoint, f64)> {
    checkpoints
        .iter()
        .filter(|c| c.use_as_reference)
        .map(|c| (c, steps - c.steps_from_center_front as f64))
        .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
}
