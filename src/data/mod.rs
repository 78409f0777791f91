//! Drill data
//!
//! - Marchers, pages and positions
//! - The field configuration and its coordinate system
//! - The position store the editor reads from and writes to

pub mod field;
pub mod model;
pub mod store;

// Re-export commonly used items
pub use field::{Checkpoint, FieldConfig};
pub use model::{Marcher, MarcherId, Page, PageId, PageSequence, Position, PositionPatch};
pub use store::{InMemoryPositionStore, PositionQuery, PositionStore};
