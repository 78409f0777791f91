//! User interface for the drill editor

pub mod hud;
pub mod theme;
pub mod toolbar;

// Re-export commonly used items
pub use hud::HudPlugin;
pub use toolbar::ToolbarPlugin;
