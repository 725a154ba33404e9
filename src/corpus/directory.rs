//! Directory-wide event reader

use super::{read_events_between, CorpusError};
use crate::keyboard::RawEvent;
use crate::utils::TimeWindow;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// Reads events from every recent file of a log directory
#[derive(Debug, Clone)]
pub struct CorpusReader {
    dir: PathBuf,
    sort: bool,
}

impl CorpusReader {
    /// Create a reader that keeps directory order
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sort: false,
        }
    }

    /// Sort the merged events by timestamp
    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Regular files modified at or after `start_time`, in directory order
    pub fn select_files(&self, start_time: f64) -> Result<Vec<PathBuf>, CorpusError> {
        let unavailable = |source: io::Error| CorpusError::DirectoryUnavailable {
            path: self.dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();

            // Follows symlinks; entries that vanish are skipped
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs_f64());
            match modified {
                Some(mtime) if mtime >= start_time => files.push(path),
                Some(_) => {}
                None => debug!("Skipping {}: no modification time", path.display()),
            }
        }

        Ok(files)
    }

    /// Events inside the window from every file modified since its start
    pub fn read_window(&self, window: TimeWindow) -> Result<Vec<RawEvent>, CorpusError> {
        let files = self.select_files(window.start)?;
        info!(
            "Reading {} event file(s) from {}",
            files.len(),
            self.dir.display()
        );
        Ok(self.read_files(&files, window))
    }

    /// Concatenate the windowed events of each file, then sort if enabled.
    ///
    /// Files that vanished or cannot be read contribute no events.
    pub fn read_files(&self, files: &[PathBuf], window: TimeWindow) -> Vec<RawEvent> {
        let mut events = Vec::new();
        for path in files {
            match read_events_between(path, window) {
                Ok(file_events) => events.extend(file_events),
                Err(CorpusError::FileVanished(path)) => {
                    debug!("{} vanished before it could be read", path.display());
                }
                Err(e) => warn!("Skipping event file: {}", e),
            }
        }

        if self.sort {
            events.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
        }
        events
    }

    /// Events at or after `start_time`
    pub fn read_since(&self, start_time: f64) -> Result<Vec<RawEvent>, CorpusError> {
        self.read_window(TimeWindow::since(start_time))
    }

    /// Events of the local calendar day containing `instant`
    pub fn read_day(&self, instant: f64) -> Result<Vec<RawEvent>, CorpusError> {
        match TimeWindow::day_containing(instant) {
            Some(window) => self.read_window(window),
            None => {
                warn!("No local day window for timestamp {}", instant);
                Ok(Vec::new())
            }
        }
    }

    /// Events of the current local calendar day
    pub fn read_today(&self) -> Result<Vec<RawEvent>, CorpusError> {
        match TimeWindow::today() {
            Some(window) => self.read_window(window),
            None => {
                warn!("No local day window for today");
                Ok(Vec::new())
            }
        }
    }
}
