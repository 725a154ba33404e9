//! Keystroke Stats - key press frequencies from recorded input event logs
//!
//! Reads binary evdev `input_event` dumps from a log directory, replays them
//! through a modifier-aware resolver and counts the resulting key labels.

pub mod config;
pub mod corpus;
pub mod keyboard;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::Config;
