//! Keycode resolution
//!
//! Turns a key-down event into a final label: table lookup, collapse of
//! ambiguous candidate sets, then at most one modifier substitution.

use super::keymap::{CodeLabelTable, Label};
use super::{ModifierTracker, RawEvent, ResolvedKeyPress};
use std::collections::BTreeSet;
use thiserror::Error;

/// Error type for label resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Candidate set has no registered canonical label
    #[error("no canonical label for ambiguous code {code} with candidates {candidates:?}")]
    AmbiguousCodeUnresolved {
        code: u16,
        candidates: BTreeSet<String>,
    },
}

/// Ordered list of canonical labels for ambiguous candidate sets.
///
/// Matching is by exact set equality; when two entries share a candidate set
/// the one declared first wins.
#[derive(Debug, Clone, Default)]
pub struct AmbiguityTable {
    entries: Vec<(String, BTreeSet<String>)>,
}

impl AmbiguityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical label for a candidate set
    pub fn with<I, S>(mut self, canonical: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(canonical, candidates);
        self
    }

    pub fn push<I, S>(&mut self, canonical: impl Into<String>, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push((
            canonical.into(),
            candidates.into_iter().map(Into::into).collect(),
        ));
    }

    /// Canonical label for an exact candidate set
    pub fn resolve(&self, candidates: &BTreeSet<String>) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, set)| set == candidates)
            .map(|(canonical, _)| canonical.as_str())
    }

    pub fn entries(&self) -> &[(String, BTreeSet<String>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Default table: `KEY_MUTE` doubles as `KEY_MIN_INTERESTING`
pub fn default_ambiguity_table() -> AmbiguityTable {
    AmbiguityTable::new().with("KEY_MUTE", ["KEY_MIN_INTERESTING", "KEY_MUTE"])
}

/// Collapse a label to one concrete string
pub fn concrete_label(
    code: u16,
    label: Label,
    ambiguity: &AmbiguityTable,
) -> Result<String, ResolveError> {
    match label {
        Label::Single(label) => Ok(label),
        Label::Ambiguous(candidates) => match ambiguity.resolve(&candidates) {
            Some(canonical) => Ok(canonical.to_string()),
            None => Err(ResolveError::AmbiguousCodeUnresolved { code, candidates }),
        },
    }
}

/// Resolves key-down events against static label tables
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    labels: &'a CodeLabelTable,
    ambiguity: &'a AmbiguityTable,
}

impl<'a> Resolver<'a> {
    pub fn new(labels: &'a CodeLabelTable, ambiguity: &'a AmbiguityTable) -> Self {
        Self { labels, ambiguity }
    }

    /// Base label for a code, with ambiguous candidates collapsed
    pub fn base_label(&self, code: u16) -> Result<String, ResolveError> {
        concrete_label(code, self.labels.label_for(code), self.ambiguity)
    }

    /// Resolve a key-down event under the current modifier state.
    ///
    /// Only the first active modifier is consulted. If it has no
    /// substitution for the label, the base label is kept even when a lower
    /// priority modifier would have one.
    pub fn resolve(
        &self,
        event: &RawEvent,
        modifiers: &ModifierTracker,
    ) -> Result<ResolvedKeyPress, ResolveError> {
        let base = self.base_label(event.code)?;

        let label = match modifiers.first_active() {
            Some(modifier) => modifier
                .substitute(&base)
                .map(str::to_string)
                .unwrap_or(base),
            None => base,
        };

        Ok(ResolvedKeyPress::new(label, event.timestamp()))
    }
}
