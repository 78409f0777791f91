use bevy::prelude::Color;

// Window Configuration
pub const WINDOW_TITLE: &str = "Drillcraft";
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 768.0;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.09, 0.2, 0.11);

// Font Sizes
pub const WIDGET_TEXT_FONT_SIZE: f32 = 16.0;
pub const TOOLBAR_TEXT_FONT_SIZE: f32 = 14.0;

// Widget Visual Style Constants
pub const WIDGET_BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
pub const WIDGET_BORDER_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
pub const WIDGET_BORDER_WIDTH: f32 = 2.0;
pub const WIDGET_PADDING: f32 = 12.0;
pub const WIDGET_MARGIN: f32 = 16.0;
pub const WIDGET_ROW_GAP: f32 = 4.0;
pub const PRIMARY_TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
pub const SECONDARY_TEXT_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

// Toolbar Visual Style Constants
pub const TOOLBAR_BORDER_WIDTH: f32 = 2.0;
pub const TOOLBAR_PADDING: f32 = 8.0;
pub const TOOLBAR_MARGIN: f32 = 16.0;
pub const TOOLBAR_ITEM_SPACING: f32 = 4.0;
pub const TOOLBAR_BUTTON_HEIGHT: f32 = 32.0;

// Button Colors
pub const NORMAL_BUTTON: Color = Color::srgb(0.1, 0.1, 0.1);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const PRESSED_BUTTON: Color = Color::srgb(1.0, 0.4, 0.0);
/// Toggle actions whose setting is on
pub const ACTIVE_BUTTON: Color = Color::srgb(0.35, 0.22, 0.05);

// Button Outline Colors
pub const NORMAL_BUTTON_OUTLINE_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
pub const HOVERED_BUTTON_OUTLINE_COLOR: Color = Color::srgb(0.75, 0.75, 0.75);
pub const PRESSED_BUTTON_OUTLINE_COLOR: Color = Color::srgb(1.0, 0.8, 0.3);

// Field Grid
pub const BOUNDARY_LINE_COLOR: Color = Color::srgb(0.95, 0.95, 0.95);
pub const YARD_LINE_COLOR: Color = Color::srgba(0.95, 0.95, 0.95, 0.8);
pub const HASH_TICK_COLOR: Color = Color::srgba(0.95, 0.95, 0.95, 0.8);
pub const STEP_LINE_COLOR: Color = Color::srgba(0.95, 0.95, 0.95, 0.12);

// Marker Rendering
pub const SELECTED_MARKER_COLOR: Color = Color::srgb(1.0, 0.85, 0.0);
pub const LOCK_INDICATOR_COLOR: Color = Color::srgb(1.0, 0.4, 0.0);
/// Fraction of the marker radius used by ghosts
pub const GHOST_RADIUS_RATIO: f32 = 0.75;
pub const MARKER_LABEL_FONT_SIZE: f32 = 9.0;
/// Labels sit above the marker, in world units
pub const MARKER_LABEL_OFFSET: f32 = 14.0;
