//! Shared test utilities for event log fixtures

use crate::keyboard::RawEvent;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Creates an empty directory unique to this process and call.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "keystroke-stats-{}-{}-{}",
        name,
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Writes events to a file in the on-disk record format.
pub fn write_events(path: &Path, events: &[RawEvent]) {
    let bytes: Vec<u8> = events.iter().flat_map(|e| e.encode()).collect();
    fs::write(path, bytes).expect("Failed to write event file");
}
