//! Raw event stream to resolved key presses
//!
//! The pipeline replays an ordered stream of raw events through a
//! [`ModifierTracker`] and a [`Resolver`]:
//!
//! - Down/Up on a modifier trigger code updates the tracker and is consumed
//! - Down on any other key is resolved and emitted (unless dropped)
//! - everything else (Up/Repeat of ordinary keys, non-key events) is ignored
//!
//! Modifier expiry is evaluated on every event at that event's timestamp.

use crate::keyboard::{KeyState, ModifierTracker, RawEvent, ResolvedKeyPress, Resolver};
use log::{debug, warn};

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Raw events seen
    pub events_seen: u64,
    /// Key presses emitted
    pub presses_emitted: u64,
    /// Modifier presses and releases consumed
    pub modifier_transitions: u64,
    /// Key presses dropped because their label could not be resolved
    pub dropped: u64,
}

/// One pipeline run over an event stream
pub struct EventPipeline<'a> {
    resolver: Resolver<'a>,
    tracker: ModifierTracker,
    stats: PipelineStats,
}

impl<'a> EventPipeline<'a> {
    /// Create a pipeline owning the given tracker for the duration of a run
    pub fn new(resolver: Resolver<'a>, tracker: ModifierTracker) -> Self {
        Self {
            resolver,
            tracker,
            stats: PipelineStats::default(),
        }
    }

    /// Feed one event, returning the key press it produced, if any
    pub fn process(&mut self, event: &RawEvent) -> Option<ResolvedKeyPress> {
        self.stats.events_seen += 1;

        if self.tracker.observe(event) {
            self.stats.modifier_transitions += 1;
            return None;
        }

        self.tracker.expire(event.timestamp());
        let state = event.key_state()?;

        if state != KeyState::Down {
            return None;
        }

        match self.resolver.resolve(event, &self.tracker) {
            Ok(press) => {
                self.stats.presses_emitted += 1;
                Some(press)
            }
            Err(e) => {
                warn!("Dropping key press at {:.6}: {}", event.timestamp(), e);
                self.stats.dropped += 1;
                None
            }
        }
    }

    /// Process every event in order and collect the emitted key presses
    pub fn run<'e, I>(&mut self, events: I) -> Vec<ResolvedKeyPress>
    where
        I: IntoIterator<Item = &'e RawEvent>,
    {
        let presses: Vec<ResolvedKeyPress> = events
            .into_iter()
            .filter_map(|event| self.process(event))
            .collect();
        debug!(
            "Pipeline emitted {} presses from {} events ({} dropped)",
            presses.len(),
            self.stats.events_seen,
            self.stats.dropped
        );
        presses
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn tracker(&self) -> &ModifierTracker {
        &self.tracker
    }

    /// End the run and hand back the tracker
    pub fn into_tracker(self) -> ModifierTracker {
        self.tracker
    }
}

/// Resolve a whole stream with a fresh tracker
pub fn resolve_key_presses(
    events: &[RawEvent],
    resolver: Resolver<'_>,
    tracker: ModifierTracker,
) -> Vec<ResolvedKeyPress> {
    EventPipeline::new(resolver, tracker).run(events)
}
