//! Reading recorded event logs from disk
//!
//! A corpus is a flat directory of binary event logs. Files are selected by
//! modification time, decoded record by record and optionally merged into one
//! chronological stream.

mod directory;
mod file;

pub use directory::CorpusReader;
pub use file::{decode_records, read_events, read_events_between};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for corpus reads
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Corpus directory is missing or cannot be listed
    #[error("event directory {path} unavailable: {source}")]
    DirectoryUnavailable { path: PathBuf, source: io::Error },
    /// File disappeared between listing and reading
    #[error("event file {0} vanished")]
    FileVanished(PathBuf),
    /// Other IO error opening a file
    #[error("IO error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}
