//!    Error handling
//!
//! Domain failures are a closed `thiserror` enum so callers can tell a
//! missing precondition from a lookup miss. File and configuration loading at
//! the application edge goes through anyhow with added context.

use anyhow::Context;
use thiserror::Error;

use crate::data::model::{MarcherId, PageId};

/// Result type for domain operations
pub type DrillResult<T> = std::result::Result<T, DrillError>;

/// Result type for application-edge operations (files, config)
pub type AppResult<T> = anyhow::Result<T>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrillError {
    /// No selected page, no field configuration, or no record for a
    /// selection. The operation aborted before mutating anything.
    #[error("missing precondition: {0}")]
    MissingPrecondition(&'static str),

    /// A position references a marcher that is not in the marcher set
    #[error("position on page {page_id} references unknown marcher {marcher_id}")]
    MarcherNotFound {
        marcher_id: MarcherId,
        page_id: PageId,
    },

    #[error("no handler registered for action '{0}'")]
    UnknownAction(String),

    #[error("chord '{chord}' is bound to both '{first}' and '{second}'")]
    DuplicateChord {
        chord: String,
        first: &'static str,
        second: &'static str,
    },

    /// A patch in a batch was rejected; the whole batch was discarded
    #[error("rejected position patch for marcher {marcher_id} on page {page_id}: {reason}")]
    InvalidPatch {
        marcher_id: MarcherId,
        page_id: PageId,
        reason: &'static str,
    },

    /// The store accepted the batch, but re-reading it for the scene failed
    #[error("saved {saved} positions but could not refresh the scene: {source}")]
    RefreshAfterWrite {
        saved: usize,
        source: Box<DrillError>,
    },

    #[error("position store failure: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Context helpers for file operations at the application edge
pub trait DrillContext<T> {
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> AppResult<T>;
}

impl<T, E> DrillContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> AppResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_context_names_the_path() {
        let err: std::result::Result<(), std::io::Error> = Err(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = format!(
            "{}",
            err.with_file_context("read", "fields/hs.json").unwrap_err()
        );
        assert_eq!(message, "Failed to read file: fields/hs.json");
    }
}
