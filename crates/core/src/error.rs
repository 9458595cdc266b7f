use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a scan before any output is written
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("logs directory '{0}' does not exist")]
    LogsRootMissing(PathBuf),

    #[error("no channel logs found at '{0}', is this a Chatterino logs directory?")]
    ChannelsTreeMissing(PathBuf),

    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid host pattern for provider '{tag}'")]
    InvalidProvider {
        tag: String,
        #[source]
        source: regex::Error,
    },

    #[error("provider '{0}' lists no hosts")]
    EmptyProvider(String),

    #[error("failed to parse provider registry '{path}'")]
    ProviderFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
