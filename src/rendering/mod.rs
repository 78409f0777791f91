//! Rendering and Visualization
//!
//! - The scene graph adapter and the sync layer that keeps it in step with
//!   the store
//! - Viewport pan and zoom
//! - Camera and gizmo drawing of the retained scene

pub mod cameras;
pub mod draw;
pub mod scene;
pub mod scene_sync;
pub mod viewport;

// Re-export commonly used items
pub use cameras::CameraPlugin;
pub use draw::DrawPlugin;
pub use scene::{RetainedScene, SceneGraph};
pub use scene_sync::SceneSync;
pub use viewport::ViewportController;
