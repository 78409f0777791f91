// Settings ///////////////////////////////////////////////////////////////////
// Tuning constants for the editor. Anything a user can toggle at runtime
// lives in `core::state::UiSettings` instead.

// Field Geometry /////////////////////////////////////////////////////////////

/// Field pixels per 8-to-5 step when no field file is given
pub const DEFAULT_PIXELS_PER_STEP: f64 = 10.0;

/// Length of one 8-to-5 step in inches
pub const INCHES_PER_STEP: f64 = 22.5;

/// Five yards in inches, the numerator of "N to 5"
pub const INCHES_PER_FIVE_YARDS: f64 = 180.0;

/// Step sizes whose rounded value is above this display as "Tiny"
pub const TINY_STEP_THRESHOLD: f64 = 64.0;

// Camera Zoom Settings ///////////////////////////////////////////////////////

/// Per-unit wheel zoom base; the new zoom is `zoom * base^delta`
pub const WHEEL_ZOOM_BASE: f64 = 0.999;

/// Minimum allowed zoom (maximum zoom out)
pub const MIN_ZOOM: f64 = 0.35;

/// Maximum allowed zoom (maximum zoom in)
pub const MAX_ZOOM: f64 = 25.0;

/// Quiet period after the last wheel event before the grid is redrawn at
/// full quality
pub const ZOOM_SETTLE_SECS: f64 = 0.050;

/// The step multiplier for zooming when using keyboard shortcuts (Cmd++ / Cmd+-)
pub const KEYBOARD_ZOOM_STEP: f64 = 0.8;

/// Wheel events reported in lines are scaled to pixels by this factor
pub const WHEEL_PIXELS_PER_LINE: f64 = 100.0;

// Marker Settings ////////////////////////////////////////////////////////////

/// Marker radius in field pixels
pub const MARKER_RADIUS: f64 = 6.0;

/// Extra slack around a marker that still counts as a hit
pub const HIT_SLOP: f64 = 3.0;

/// Spacing of unknown-position markers parked below the field
pub const UNKNOWN_MARKER_SPACING: f64 = 18.0;
