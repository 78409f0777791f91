//! Step size analysis
//!
//! A step size says how far a marcher travels per count between two pages,
//! expressed the way drill writers talk about it: "N to 5" means N steps
//! cover five yards. Smaller N is a bigger, harder step.

use crate::core::settings::{INCHES_PER_FIVE_YARDS, INCHES_PER_STEP, TINY_STEP_THRESHOLD};
use crate::data::field::FieldConfig;
use crate::data::model::{MarcherId, Page, Position};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepSize {
    /// The page has no duration, so no rate can be computed
    Undefined,
    /// The marcher does not move
    Hold,
    /// Moves, but less than 64-to-5
    Tiny,
    /// Steps per five yards
    Numeric(f64),
}

impl StepSize {
    /// Value rounded to one decimal, as shown to the user
    pub fn rounded(&self) -> Option<f64> {
        match self {
            StepSize::Numeric(value) => Some(round_one_decimal(*value)),
            _ => None,
        }
    }

    /// Orders by physical stride length: `Greater` means a longer stride.
    ///
    /// Numeric values are inverted (4-to-5 is a bigger step than 8-to-5).
    /// Undefined sorts below everything since it carries no distance.
    pub fn physical_cmp(&self, other: &StepSize) -> Ordering {
        self.physical_rank().total_cmp(&other.physical_rank())
    }

    fn physical_rank(&self) -> f64 {
        match self {
            StepSize::Undefined => f64::NEG_INFINITY,
            StepSize::Hold => -1.0,
            StepSize::Tiny => 0.0,
            StepSize::Numeric(value) => 1.0 / value,
        }
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSize::Undefined => write!(f, "Undefined"),
            StepSize::Hold => write!(f, "Hold"),
            StepSize::Tiny => write!(f, "Tiny"),
            StepSize::Numeric(value) => write!(f, "{} to 5", round_one_decimal(*value)),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Step size for one marcher moving from `start` to `end` over `page`.
///
/// Returns `None` when there is nothing to compare against, e.g. on the
/// first page.
pub fn step_size(
    start: Option<&Position>,
    end: &Position,
    page: Option<&Page>,
    field: &FieldConfig,
) -> Option<StepSize> {
    let (start, page) = (start?, page?);
    if page.counts == 0 {
        return Some(StepSize::Undefined);
    }

    let distance = start.point().distance(end.point());
    if distance == 0.0 {
        return Some(StepSize::Hold);
    }

    let steps = distance / field.pixels_per_step;
    let inches_per_count = steps * INCHES_PER_STEP / page.counts as f64;
    let value = INCHES_PER_FIVE_YARDS / inches_per_count;

    if round_one_decimal(value) > TINY_STEP_THRESHOLD {
        Some(StepSize::Tiny)
    } else {
        Some(StepSize::Numeric(value))
    }
}

/// The extremes of a page's step sizes, by physical stride
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizeRange {
    /// Longest stride (smallest "N to 5")
    pub largest: (MarcherId, StepSize),
    /// Shortest stride (largest "N to 5", or a hold)
    pub smallest: (MarcherId, StepSize),
}

/// Step size extremes for every marcher with a position on both pages.
///
/// `Undefined` results are skipped; `None` when nothing could be measured.
pub fn step_size_range(
    start_positions: &[Position],
    end_positions: &[Position],
    page: &Page,
    field: &FieldConfig,
) -> Option<StepSizeRange> {
    let starts: HashMap<MarcherId, &Position> = start_positions
        .iter()
        .map(|position| (position.marcher_id, position))
        .collect();

    let mut range: Option<StepSizeRange> = None;
    for end in end_positions {
        let start = starts.get(&end.marcher_id).copied();
        let Some(size) = step_size(start, end, Some(page), field) else {
            continue;
        };
        if size == StepSize::Undefined {
            continue;
        }
        let entry = (end.marcher_id, size);
        range = Some(match range {
            None => StepSizeRange {
                largest: entry,
                smallest: entry,
            },
            Some(mut current) => {
                if size.physical_cmp(&current.largest.1) == Ordering::Greater {
                    current.largest = entry;
                }
                if size.physical_cmp(&current.smallest.1) == Ordering::Less {
                    current.smallest = entry;
                }
                current
            }
        });
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PageId;

    fn field(pixels_per_step: f64) -> FieldConfig {
        FieldConfig {
            pixels_per_step,
            ..FieldConfig::high_school_football()
        }
    }

    fn page(counts: u32) -> Page {
        Page {
            id: PageId(1),
            order: 1,
            counts,
            name: "1".to_string(),
        }
    }

    fn at(marcher: u32, x: f64, y: f64) -> Position {
        Position::new(MarcherId(marcher), PageId(1), x, y)
    }

    #[test]
    fn no_start_or_page_means_nothing_to_compute() {
        let end = at(0, 0.0, 0.0);
        assert_eq!(step_size(None, &end, Some(&page(4)), &field(10.0)), None);
        assert_eq!(step_size(Some(&end), &end, None, &field(10.0)), None);
    }

    #[test]
    fn standing_still_is_a_hold() {
        let start = at(0, 0.0, 0.0);
        let size = step_size(Some(&start), &start, Some(&page(4)), &field(10.0));
        assert_eq!(size, Some(StepSize::Hold));
    }

    #[test]
    fn zero_counts_is_undefined() {
        let start = at(0, 0.0, 0.0);
        let size = step_size(Some(&start), &start, Some(&page(0)), &field(10.0));
        assert_eq!(size, Some(StepSize::Undefined));
    }

    #[test]
    fn one_step_in_one_count_is_eight_to_five() {
        let size = step_size(
            Some(&at(0, 0.0, 0.0)),
            &at(0, 0.0, 10.0),
            Some(&page(1)),
            &field(10.0),
        )
        .unwrap();
        assert_eq!(size, StepSize::Numeric(8.0));
        assert_eq!(size.to_string(), "8 to 5");
    }

    #[test]
    fn display_rounds_to_one_decimal() {
        assert_eq!(StepSize::Numeric(7.4999).to_string(), "7.5 to 5");
        assert_eq!(StepSize::Numeric(12.04).to_string(), "12 to 5");
    }

    #[test]
    fn very_small_motion_is_tiny() {
        // 1 pixel over 8 counts is 640 to 5
        let size = step_size(
            Some(&at(0, 0.0, 0.0)),
            &at(0, 1.0, 0.0),
            Some(&page(8)),
            &field(10.0),
        );
        assert_eq!(size, Some(StepSize::Tiny));
    }

    #[test]
    fn comparator_treats_smaller_value_as_larger_step() {
        let four = StepSize::Numeric(4.0);
        let eight = StepSize::Numeric(8.0);
        assert_eq!(four.physical_cmp(&eight), Ordering::Greater);
        assert_eq!(StepSize::Hold.physical_cmp(&StepSize::Tiny), Ordering::Less);
        assert_eq!(StepSize::Tiny.physical_cmp(&eight), Ordering::Less);
    }

    #[test]
    fn range_reports_physical_extremes() {
        let starts = vec![at(0, 0.0, 0.0), at(1, 0.0, 0.0), at(2, 0.0, 0.0)];
        // 2 steps (4 to 5), 1 step (8 to 5), and a hold over one count
        let ends = vec![at(0, 0.0, 20.0), at(1, 10.0, 0.0), at(2, 0.0, 0.0)];

        let range = step_size_range(&starts, &ends, &page(1), &field(10.0)).unwrap();

        assert_eq!(range.largest, (MarcherId(0), StepSize::Numeric(4.0)));
        assert_eq!(range.smallest, (MarcherId(2), StepSize::Hold));
    }

    #[test]
    fn range_skips_marchers_without_a_start() {
        let starts = vec![at(0, 0.0, 0.0)];
        let ends = vec![at(0, 0.0, 10.0), at(1, 50.0, 50.0)];

        let range = step_size_range(&starts, &ends, &page(1), &field(10.0)).unwrap();

        assert_eq!(range.largest.0, MarcherId(0));
        assert_eq!(range.smallest.0, MarcherId(0));
    }

    #[test]
    fn range_is_empty_for_zero_count_page() {
        let starts = vec![at(0, 0.0, 0.0)];
        let ends = vec![at(0, 0.0, 10.0)];
        assert_eq!(step_size_range(&starts, &ends, &page(0), &field(10.0)), None);
    }
}
