//! Configuration management for Keystroke Stats
//!
//! Holds the event directory and the static tables the pipeline runs with:
//! modifier definitions (in priority order) and canonical labels for
//! ambiguous key codes.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keystroke-stats/config.toml` |
//! | macOS | `~/Library/Application Support/keystroke-stats/config.toml` |
//! | Windows | `%APPDATA%\keystroke-stats\config.toml` |
//!
//! The `INPUT_EVENTS_PATH` environment variable overrides `input.events_path`.
//!
//! ## Example
//!
//! ```no_run
//! use keystroke_stats::Config;
//!
//! let config = Config::load().unwrap_or_default();
//! let tracker = config.modifier_tracker();
//! println!("{} modifiers, max age {}s", tracker.modifiers().len(), tracker.max_age());
//! ```

use crate::keyboard::{
    default_ambiguity_table, AmbiguityTable, Modifier, ModifierTracker, DEFAULT_MAX_AGE_SECS,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming the event log directory
pub const EVENTS_PATH_ENV: &str = "INPUT_EVENTS_PATH";

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    NoConfigDir,
    /// IO error reading or writing config file
    Io(io::Error),
    /// Failed to parse config file
    Parse(toml::de::Error),
    /// Failed to serialize config
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Returns the path to the config file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("keystroke-stats").join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Event log input settings
    #[serde(default)]
    pub input: InputConfig,
    /// Modifier key settings
    #[serde(default)]
    pub modifiers: ModifierConfig,
    /// Canonical labels for ambiguous key codes, first match wins
    #[serde(default = "default_ambiguity")]
    pub ambiguity: Vec<AmbiguityEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            modifiers: ModifierConfig::default(),
            ambiguity: default_ambiguity(),
        }
    }
}

/// Event log input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the binary event logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,
    /// Merge events from all files in timestamp order
    pub sort: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            sort: true,
        }
    }
}

/// Modifier tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    /// Seconds after which a held modifier is assumed released
    pub max_age_secs: f64,
    /// Modifier definitions in priority order
    pub definitions: Vec<ModifierDefinition>,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            definitions: vec![
                ModifierDefinition::from(&Modifier::altgr()),
                ModifierDefinition::from(&Modifier::shift()),
            ],
        }
    }
}

/// One modifier key and its substitution table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierDefinition {
    pub name: String,
    pub trigger_codes: Vec<u16>,
    #[serde(default)]
    pub substitutions: HashMap<String, String>,
}

impl From<&Modifier> for ModifierDefinition {
    fn from(modifier: &Modifier) -> Self {
        Self {
            name: modifier.name.clone(),
            trigger_codes: modifier.trigger_codes.iter().copied().collect(),
            substitutions: modifier.substitutions.clone(),
        }
    }
}

impl ModifierDefinition {
    pub fn to_modifier(&self) -> Modifier {
        Modifier::new(
            self.name.clone(),
            self.trigger_codes.iter().copied(),
            self.substitutions.clone(),
        )
    }
}

/// Canonical label for one ambiguous candidate set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbiguityEntry {
    pub canonical: String,
    pub candidates: BTreeSet<String>,
}

fn default_ambiguity() -> Vec<AmbiguityEntry> {
    default_ambiguity_table()
        .entries()
        .iter()
        .map(|(canonical, candidates)| AmbiguityEntry {
            canonical: canonical.clone(),
            candidates: candidates.clone(),
        })
        .collect()
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Event directory, preferring the environment override
    pub fn events_path(&self) -> Option<PathBuf> {
        std::env::var_os(EVENTS_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.input.events_path.clone())
    }

    /// Fresh modifier tracker for one pipeline run
    pub fn modifier_tracker(&self) -> ModifierTracker {
        let modifiers = self
            .modifiers
            .definitions
            .iter()
            .map(ModifierDefinition::to_modifier)
            .collect();
        ModifierTracker::new(modifiers).with_max_age(self.modifiers.max_age_secs)
    }

    /// Ambiguity table in declaration order
    pub fn ambiguity_table(&self) -> AmbiguityTable {
        let mut table = AmbiguityTable::new();
        for entry in &self.ambiguity {
            table.push(entry.canonical.clone(), entry.candidates.iter().cloned());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("keystroke-stats-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.input.events_path, None);
        assert!(config.input.sort);
        assert_eq!(config.modifiers.max_age_secs, 10.0);
        assert_eq!(config.modifiers.definitions.len(), 2);
        assert_eq!(config.modifiers.definitions[0].name, "altgr");
        assert_eq!(config.modifiers.definitions[1].name, "shift");
        assert_eq!(config.ambiguity.len(), 1);
        assert_eq!(config.ambiguity[0].canonical, "KEY_MUTE");
    }

    #[test]
    fn config_builds_tracker_in_order() {
        let config = Config::default();
        let tracker = config.modifier_tracker();
        let names: Vec<&str> = tracker.modifiers().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["altgr", "shift"]);
        assert!(tracker.modifiers()[0].is_triggered_by(100));
        assert!(tracker.modifiers()[1].is_triggered_by(42));
        assert!(tracker.modifiers()[1].is_triggered_by(54));
    }

    #[test]
    fn config_builds_ambiguity_table() {
        let table = Config::default().ambiguity_table();
        let candidates: BTreeSet<String> = ["KEY_MIN_INTERESTING", "KEY_MUTE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(table.resolve(&candidates), Some("KEY_MUTE"));
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.input.events_path = Some(PathBuf::from("/var/log/keys"));
        config.modifiers.max_age_secs = 5.0;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.input.events_path, Some(PathBuf::from("/var/log/keys")));
        assert_eq!(loaded.modifiers.max_age_secs, 5.0);
        assert_eq!(loaded.modifiers.definitions, config.modifiers.definitions);
        assert_eq!(loaded.ambiguity, config.ambiguity);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[input]
events_path = "/data/keys"
sort = false

[modifiers]
max_age_secs = 3.5

[[modifiers.definitions]]
name = "shift"
trigger_codes = [42]

[modifiers.definitions.substitutions]
a = "A"

[[ambiguity]]
canonical = "KEY_SCREENLOCK"
candidates = ["KEY_COFFEE", "KEY_SCREENLOCK"]
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.input.events_path, Some(PathBuf::from("/data/keys")));
        assert!(!config.input.sort);
        assert_eq!(config.modifiers.max_age_secs, 3.5);
        assert_eq!(config.modifiers.definitions.len(), 1);
        assert_eq!(
            config.modifiers.definitions[0].substitutions.get("a").map(String::as_str),
            Some("A")
        );
        assert_eq!(config.ambiguity.len(), 1);
        assert_eq!(config.ambiguity[0].canonical, "KEY_SCREENLOCK");

        let tracker = config.modifier_tracker();
        assert_eq!(tracker.max_age(), 3.5);
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").expect("Failed to deserialize");
        assert!(config.input.sort);
        assert_eq!(config.modifiers.definitions.len(), 2);
        assert_eq!(config.ambiguity.len(), 1);
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[modifiers]"));
        assert!(toml_str.contains("max_age_secs = 10.0"));
        assert!(toml_str.contains("KEY_MIN_INTERESTING"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
