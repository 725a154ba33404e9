//! Key event decoding, modifier tracking and label resolution

mod event;
pub mod keymap;
mod modifier;
mod resolver;

pub use event::{DecodeError, KeyState, RawEvent, ResolvedKeyPress, EV_KEY, RECORD_SIZE};
pub use keymap::{CodeLabelTable, Label, DEFAULT_LABELS};
pub use modifier::{Modifier, ModifierTracker, DEFAULT_MAX_AGE_SECS};
pub use resolver::{
    concrete_label, default_ambiguity_table, AmbiguityTable, ResolveError, Resolver,
};
