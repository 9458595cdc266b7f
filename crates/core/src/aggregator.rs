use chrono::NaiveDateTime;

use crate::domain::{ExportBundle, LinkRecord, ScanStats};

/// Collects link records over a whole run
#[derive(Debug, Default)]
pub struct Aggregator {
    links: Vec<LinkRecord>,
    stats: ScanStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LinkRecord) {
        self.links.push(record);
    }

    pub fn total(&self) -> usize {
        self.links.len()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut ScanStats {
        &mut self.stats
    }

    /// Builds the bundle. Links are ordered by date; the sort is stable, so
    /// records with the same timestamp keep the order they were found in.
    pub fn finish(self, channels: Vec<String>, created: NaiveDateTime) -> (ExportBundle, ScanStats) {
        let mut links = self.links;
        links.sort_by_key(|link| link.date);

        let bundle = ExportBundle {
            total: links.len(),
            created,
            channels,
            links,
        };
        (bundle, self.stats)
    }
}
