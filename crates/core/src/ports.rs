use crate::domain::ExportBundle;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON output")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("failed to move finished output into '{path}'")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for writing a finished export bundle.
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait LinkExporter {
    /// Writes the bundle and returns the number of links saved
    fn export(&self, bundle: &ExportBundle) -> Result<usize, ExportError>;

    /// Human-readable name of the output kind, used in the confirmation prompt
    fn describe(&self) -> String;

    fn output_path(&self) -> &std::path::Path;
}
