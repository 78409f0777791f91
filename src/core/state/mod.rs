//! Editor state shared by the dispatcher and the Bevy systems

pub mod editor;
pub mod selection;
pub mod ui_settings;

pub use editor::EditorContext;
pub use selection::{FetchTicket, SelectionState};
pub use ui_settings::{UiSettings, UiToggle};
