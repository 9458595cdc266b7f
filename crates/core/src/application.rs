use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::domain::{ChannelPattern, ExportBundle, ScanStats};
use crate::error::Result;
use crate::extractor::extract_links;
use crate::parser::parse_line;
use crate::ports::{ExportError, LinkExporter};
use crate::providers::ProviderRegistry;
use crate::resolver::{channels_root, list_log_files, resolve_channels};
use crate::utils::log_file_date;

/// Where to find the logs
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub logs_dir: PathBuf,
    /// Platform subtree inside the logs directory
    pub platform: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("."),
            platform: "Twitch".to_string(),
        }
    }
}

/// Application service for finding image links and saving them
pub struct LinkExtractionService {
    config: ScanConfig,
    registry: ProviderRegistry,
    exporter: Box<dyn LinkExporter>,
}

impl LinkExtractionService {
    /// Creates a new LinkExtractionService with the given dependencies
    pub fn new(config: ScanConfig, registry: ProviderRegistry, exporter: Box<dyn LinkExporter>) -> Self {
        Self {
            config,
            registry,
            exporter,
        }
    }

    pub fn exporter(&self) -> &dyn LinkExporter {
        self.exporter.as_ref()
    }

    /// Scans every channel matched by `requested` and returns the finished bundle.
    /// `created` is stamped on the bundle as its generation time.
    pub fn collect_links(&self, requested: &[String], created: NaiveDateTime) -> Result<(ExportBundle, ScanStats)> {
        let patterns: Vec<ChannelPattern> = requested.iter().map(|p| ChannelPattern::parse(p)).collect();
        let root = channels_root(&self.config.logs_dir, &self.config.platform)?;
        let resolution = resolve_channels(&root, &patterns)?;

        let mut aggregator = Aggregator::new();
        aggregator.stats_mut().unmatched_patterns = resolution.unmatched;

        for channel in &resolution.channels {
            for file in list_log_files(&channel.path)? {
                self.scan_file(&file, &channel.name, &mut aggregator);
            }
            debug!("Links so far after channel '{}': {}", channel.name, aggregator.total());
        }

        let channels = patterns.iter().map(ChannelPattern::as_requested).collect();
        let (bundle, stats) = aggregator.finish(channels, created);
        info!(
            "Scanned {} files in {} channels: {} links, {} lines skipped, {} links discarded",
            stats.files_scanned,
            resolution.channels.len(),
            bundle.total,
            stats.lines_skipped,
            stats.links_discarded
        );
        Ok((bundle, stats))
    }

    /// Writes the bundle through the configured exporter
    pub fn save_links(&self, bundle: &ExportBundle) -> std::result::Result<usize, ExportError> {
        self.exporter.export(bundle)
    }

    /// Feeds one log file through parser, extractor and classifier.
    /// Unreadable files are logged and counted, never fatal.
    fn scan_file(&self, path: &Path, channel: &str, aggregator: &mut Aggregator) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Unable to open '{}': {} - skipping", path.display(), e);
                aggregator.stats_mut().files_unreadable += 1;
                return;
            }
        };

        let file_date = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(log_file_date);
        if file_date.is_none() {
            debug!("No date in file name '{}', only fully dated lines will parse", path.display());
        }

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Unable to read '{}': {} - skipping rest of file", path.display(), e);
                    aggregator.stats_mut().files_unreadable += 1;
                    return;
                }
            }
            aggregator.stats_mut().lines_read += 1;

            // Chatterino sometimes garbles its output, decode what we can
            let line = String::from_utf8_lossy(&buf);
            let Some(event) = parse_line(&line, channel, file_date) else {
                debug!("Unable to parse line: {}", line.trim_end());
                aggregator.stats_mut().lines_skipped += 1;
                continue;
            };

            for candidate in extract_links(&event.message) {
                match self.registry.classify(candidate) {
                    Some(classification) => aggregator.push(classification.into_record(&event)),
                    None => aggregator.stats_mut().links_discarded += 1,
                }
            }
        }

        aggregator.stats_mut().files_scanned += 1;
    }
}
