//! Maps channel patterns onto the channel directories of a logs tree.
//!
//! Chatterino stores logs as `<logs>/<Platform>/Channels/<channel>/<channel>-YYYY-MM-DD.log`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::ChannelPattern;
use crate::error::{Result, ScanError};

const CHANNELS_DIR: &str = "Channels";

/// A channel directory selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub name: String,
    pub path: PathBuf,
}

/// Result of matching patterns against the channels on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Channels in scan order, each listed once
    pub channels: Vec<ResolvedChannel>,
    /// Patterns that matched no channel
    pub unmatched: Vec<String>,
}

/// Returns `<logs_dir>/<platform>/Channels`, checking that it exists
pub fn channels_root(logs_dir: &Path, platform: &str) -> Result<PathBuf> {
    if !logs_dir.is_dir() {
        return Err(ScanError::LogsRootMissing(logs_dir.to_path_buf()));
    }

    let root = logs_dir.join(platform).join(CHANNELS_DIR);
    if !root.is_dir() {
        return Err(ScanError::ChannelsTreeMissing(root));
    }
    Ok(root)
}

/// Channel directory names under `root`, sorted
fn list_channels(root: &Path) -> Result<Vec<String>> {
    let io_err = |source: std::io::Error| ScanError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        // Twitch logins are ASCII, anything else isn't a channel directory
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Expands patterns into the channels to scan, in pattern order
pub fn resolve_channels(root: &Path, patterns: &[ChannelPattern]) -> Result<Resolution> {
    let available = list_channels(root)?;
    let mut seen = HashSet::new();
    let mut resolution = Resolution::default();

    for pattern in patterns {
        let matched: Vec<&String> = available.iter().filter(|name| pattern.matches(name)).collect();

        if matched.is_empty() {
            warn!("Channel '{}' does not have logs", pattern.as_requested());
            resolution.unmatched.push(pattern.as_requested());
            continue;
        }

        if let ChannelPattern::PrefixWildcard(_) = pattern {
            info!(
                "Channels captured from '{}': {}",
                pattern.as_requested(),
                matched.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            );
        }

        for name in matched {
            if seen.insert(name.clone()) {
                resolution.channels.push(ResolvedChannel {
                    name: name.clone(),
                    path: root.join(name),
                });
            }
        }
    }

    Ok(resolution)
}

/// Log files of one channel, sorted by name so dated files come in order
pub fn list_log_files(channel_dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| ScanError::Io {
        path: channel_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(channel_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
