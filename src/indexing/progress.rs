//! Statistics for an indexing batch

use crate::cache::PropagationStats;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MAX_ERRORS: usize = 100;

/// Statistics collected during one batch
#[derive(Debug, Default, Clone)]
pub struct IndexStats {
    /// Files whose new tree was added to the cache
    pub files_indexed: usize,

    /// Files whose latest parse failed
    pub files_failed: usize,

    /// Classes, modules and methods registered
    pub members_found: usize,

    /// Result of the propagation pass that closed the batch
    pub propagation: Option<PropagationStats>,

    /// Time elapsed during the batch
    pub elapsed: Duration,

    /// Parse failures, first diagnostic per file (limited to the first 100)
    pub errors: Vec<(PathBuf, String)>,

    start_time: Option<Instant>,
}

impl IndexStats {
    /// Create new stats and start timing
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Stop timing and record elapsed time
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed = start.elapsed();
            self.start_time = None;
        }
    }

    pub fn add_error(&mut self, path: PathBuf, error: String) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push((path, error));
        }
        self.files_failed += 1;
    }

    /// Log a summary of the batch
    pub fn report(&self) {
        tracing::info!(
            files_indexed = self.files_indexed,
            files_failed = self.files_failed,
            members = self.members_found,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "indexing batch complete"
        );
        for (path, error) in self.errors.iter().take(5) {
            tracing::warn!(path = %path.display(), "{error}");
        }
        if self.errors.len() > 5 {
            tracing::warn!("... and {} more errors", self.errors.len() - 5);
        }
    }
}
