//! Modifier key tracking
//!
//! Tracks which modifiers (Shift, AltGr, ...) are held while replaying a
//! recorded event stream. All times are event-stream timestamps, so replaying
//! the same log always yields the same modifier states.

use super::keymap::{altgr_substitutions, shift_substitutions};
use super::{KeyState, RawEvent};
use log::warn;
use std::collections::{BTreeSet, HashMap};

/// Default age after which a held modifier is assumed released
pub const DEFAULT_MAX_AGE_SECS: f64 = 10.0;

/// A modifier key and its label substitutions
#[derive(Debug, Clone)]
pub struct Modifier {
    /// Identity of the modifier
    pub name: String,
    /// Key codes that press or release this modifier
    pub trigger_codes: BTreeSet<u16>,
    /// Label replacements applied while the modifier is active
    pub substitutions: HashMap<String, String>,
    active: bool,
    last_transition: f64,
}

impl Modifier {
    pub fn new(
        name: impl Into<String>,
        trigger_codes: impl IntoIterator<Item = u16>,
        substitutions: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            trigger_codes: trigger_codes.into_iter().collect(),
            substitutions,
            active: false,
            last_transition: 0.0,
        }
    }

    /// Right Alt acting as AltGr
    pub fn altgr() -> Self {
        Self::new("altgr", [100], altgr_substitutions())
    }

    /// Either shift key
    pub fn shift() -> Self {
        Self::new("shift", [42, 54], shift_substitutions())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Timestamp of the last press or release
    pub fn last_transition(&self) -> f64 {
        self.last_transition
    }

    pub fn is_triggered_by(&self, code: u16) -> bool {
        self.trigger_codes.contains(&code)
    }

    /// Substitute a label, if this modifier has a replacement for it
    pub fn substitute(&self, label: &str) -> Option<&str> {
        self.substitutions.get(label).map(String::as_str)
    }

    fn set(&mut self, active: bool, timestamp: f64) {
        self.active = active;
        self.last_transition = timestamp;
    }
}

/// Stateful registry of modifiers in priority order
#[derive(Debug, Clone)]
pub struct ModifierTracker {
    modifiers: Vec<Modifier>,
    max_age: f64,
    expired_count: u64,
}

impl Default for ModifierTracker {
    /// AltGr takes precedence over Shift
    fn default() -> Self {
        Self::new(vec![Modifier::altgr(), Modifier::shift()])
    }
}

impl ModifierTracker {
    /// Create a tracker; declaration order is priority order
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        Self {
            modifiers,
            max_age: DEFAULT_MAX_AGE_SECS,
            expired_count: 0,
        }
    }

    /// Set the maximum time a modifier may stay active without a transition
    pub fn with_max_age(mut self, max_age_secs: f64) -> Self {
        self.max_age = max_age_secs;
        self
    }

    pub fn max_age(&self) -> f64 {
        self.max_age
    }

    /// All modifiers in priority order
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn get(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.name == name)
    }

    /// First active modifier in priority order
    pub fn first_active(&self) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.active)
    }

    /// Number of modifiers force-released by the expiry sweep
    pub fn expired_count(&self) -> u64 {
        self.expired_count
    }

    /// Apply a modifier key event.
    ///
    /// Returns `true` if the event was a Down or Up for a trigger code and
    /// has been consumed. Runs an expiry sweep at the event's timestamp.
    pub fn observe(&mut self, event: &RawEvent) -> bool {
        let active = match event.key_state() {
            Some(KeyState::Down) => true,
            Some(KeyState::Up) => false,
            _ => return false,
        };

        let timestamp = event.timestamp();
        let mut consumed = false;
        for modifier in self.modifiers.iter_mut().filter(|m| m.is_triggered_by(event.code)) {
            modifier.set(active, timestamp);
            consumed = true;
        }

        if consumed {
            self.expire(timestamp);
        }
        consumed
    }

    /// Deactivate modifiers whose last transition is older than the max age
    pub fn expire(&mut self, now: f64) {
        for modifier in self.modifiers.iter_mut() {
            if modifier.active && now - modifier.last_transition > self.max_age {
                warn!(
                    "Modifier '{}' active for {:.1}s without release, deactivating",
                    modifier.name,
                    now - modifier.last_transition
                );
                modifier.active = false;
                self.expired_count += 1;
            }
        }
    }
}
