//! Key press frequency counting

use crate::keyboard::{
    concrete_label, AmbiguityTable, CodeLabelTable, KeyState, Label, RawEvent, ResolvedKeyPress,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key-down event labelled from the code table, without modifiers applied
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledKeyDown {
    pub code: u16,
    pub label: Label,
    pub timestamp: f64,
}

/// Every key-down in the stream, labelled by code only.
///
/// Modifier keys are kept and counted like any other key.
pub fn key_down_labels(events: &[RawEvent], labels: &CodeLabelTable) -> Vec<LabeledKeyDown> {
    events
        .iter()
        .filter(|event| event.key_state() == Some(KeyState::Down))
        .map(|event| LabeledKeyDown {
            code: event.code,
            label: labels.label_for(event.code),
            timestamp: event.timestamp(),
        })
        .collect()
}

/// Occurrence count per label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count resolved key presses
    pub fn from_presses<'a, I>(presses: I) -> Self
    where
        I: IntoIterator<Item = &'a ResolvedKeyPress>,
    {
        let mut table = Self::new();
        for press in presses {
            table.record(&press.label);
        }
        table
    }

    /// Count raw key-downs, collapsing ambiguous labels.
    ///
    /// Candidate sets without a canonical label are skipped.
    pub fn from_key_downs<'a, I>(key_downs: I, ambiguity: &AmbiguityTable) -> Self
    where
        I: IntoIterator<Item = &'a LabeledKeyDown>,
    {
        let mut table = Self::new();
        for key_down in key_downs {
            match concrete_label(key_down.code, key_down.label.clone(), ambiguity) {
                Ok(label) => {
                    if matches!(key_down.label, Label::Ambiguous(_)) {
                        info!("Mapped ambiguous code {} to {}", key_down.code, label);
                    }
                    table.record(&label);
                }
                Err(e) => warn!("Skipping key-down: {}", e),
            }
        }
        table
    }

    /// Increment the count for a label
    pub fn record(&mut self, label: &str) {
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, &count)| (label.as_str(), count))
    }

    /// Entries by descending count, ties broken by label
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

impl<'a> FromIterator<&'a ResolvedKeyPress> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a ResolvedKeyPress>>(iter: I) -> Self {
        Self::from_presses(iter)
    }
}
