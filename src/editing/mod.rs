//! Editing: actions, their dispatch, and the window input that feeds them

pub mod actions;
pub mod chord;
pub mod dispatcher;
pub mod input;
pub mod playback;
pub mod selection_fetch;

// Re-export important types and plugins
pub use actions::{ActionId, ActionRegistry};
pub use dispatcher::ActionDispatcher;
pub use input::InputPlugin;
pub use playback::PlaybackPlugin;
pub use selection_fetch::SelectionFetchPlugin;
