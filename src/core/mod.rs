//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and configuration
//! - Editor state shared by the dispatcher and the systems
//! - Errors, settings and CLI handling

pub mod app;
pub mod cli;
pub mod errors;
pub mod settings;
pub mod state;

// Re-export commonly used items
pub use app::create_app;
pub use cli::CliArgs;
pub use errors::{AppResult, DrillError, DrillResult};
pub use state::{EditorContext, UiSettings};
