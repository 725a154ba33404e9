//! Raw input event records and their binary encoding
//!
//! Each record is the kernel's `struct input_event` as written to disk by a
//! logging daemon: 24 bytes, little-endian.
//!
//! | Offset | Size | Field        |
//! |--------|------|--------------|
//! | 0      | 8    | seconds      |
//! | 8      | 8    | microseconds |
//! | 16     | 2    | type         |
//! | 18     | 2    | code         |
//! | 20     | 4    | value        |

use thiserror::Error;

/// Event type identifying a key event
pub const EV_KEY: u16 = 0x01;

/// Size of one encoded record in bytes
pub const RECORD_SIZE: usize = 24;

/// Error type for record decoding
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer is not exactly one record long
    #[error("malformed record: expected {RECORD_SIZE} bytes, got {0}")]
    MalformedRecord(usize),
}

/// State of a key carried by a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed down
    Down,
    /// Key was released
    Up,
    /// Key is held and auto-repeating
    Repeat,
}

impl KeyState {
    /// Map a key event value to a state (1 = down, 0 = up, 2 = repeat)
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Down),
            0 => Some(Self::Up),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }

    /// The raw event value for this state
    pub fn value(&self) -> i32 {
        match self {
            Self::Down => 1,
            Self::Up => 0,
            Self::Repeat => 2,
        }
    }
}

/// A decoded input event record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub seconds: u64,
    pub microseconds: u64,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(seconds: u64, microseconds: u64, event_type: u16, code: u16, value: i32) -> Self {
        Self {
            seconds,
            microseconds,
            event_type,
            code,
            value,
        }
    }

    /// Build a key event at a fractional timestamp (seconds since the epoch)
    pub fn key(timestamp: f64, code: u16, state: KeyState) -> Self {
        let seconds = timestamp.trunc() as u64;
        let microseconds = ((timestamp - seconds as f64) * 1_000_000.0).round() as u64;
        Self::new(seconds, microseconds.min(999_999), EV_KEY, code, state.value())
    }

    /// Event time in seconds since the epoch
    pub fn timestamp(&self) -> f64 {
        self.seconds as f64 + self.microseconds as f64 / 1_000_000.0
    }

    /// Key state, or `None` if this is not a key event
    pub fn key_state(&self) -> Option<KeyState> {
        if self.event_type != EV_KEY {
            return None;
        }
        KeyState::from_value(self.value)
    }

    /// Decode exactly one record
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != RECORD_SIZE {
            return Err(DecodeError::MalformedRecord(buf.len()));
        }

        let mut seconds = [0u8; 8];
        let mut microseconds = [0u8; 8];
        let mut event_type = [0u8; 2];
        let mut code = [0u8; 2];
        let mut value = [0u8; 4];
        seconds.copy_from_slice(&buf[0..8]);
        microseconds.copy_from_slice(&buf[8..16]);
        event_type.copy_from_slice(&buf[16..18]);
        code.copy_from_slice(&buf[18..20]);
        value.copy_from_slice(&buf[20..24]);

        Ok(Self {
            seconds: u64::from_le_bytes(seconds),
            microseconds: u64::from_le_bytes(microseconds),
            event_type: u16::from_le_bytes(event_type),
            code: u16::from_le_bytes(code),
            value: i32::from_le_bytes(value),
        })
    }

    /// Encode into the on-disk record layout
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.seconds.to_le_bytes());
        buf[8..16].copy_from_slice(&self.microseconds.to_le_bytes());
        buf[16..18].copy_from_slice(&self.event_type.to_le_bytes());
        buf[18..20].copy_from_slice(&self.code.to_le_bytes());
        buf[20..24].copy_from_slice(&self.value.to_le_bytes());
        buf
    }
}

/// A key press after label resolution and modifier substitution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKeyPress {
    pub label: String,
    pub timestamp: f64,
}

impl ResolvedKeyPress {
    pub fn new(label: impl Into<String>, timestamp: f64) -> Self {
        Self {
            label: label.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_little_endian_fields() {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0] = 0x10; // seconds = 16
        buf[8] = 0x20; // microseconds = 32
        buf[16] = 0x01; // EV_KEY
        buf[18] = 0x1e; // code 30
        buf[20..24].copy_from_slice(&(-1i32).to_le_bytes());

        let event = RawEvent::decode(&buf).unwrap();
        assert_eq!(event.seconds, 16);
        assert_eq!(event.microseconds, 32);
        assert_eq!(event.event_type, EV_KEY);
        assert_eq!(event.code, 30);
        assert_eq!(event.value, -1);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(
            RawEvent::decode(&[0u8; 23]),
            Err(DecodeError::MalformedRecord(23))
        );
        assert_eq!(
            RawEvent::decode(&[0u8; 25]),
            Err(DecodeError::MalformedRecord(25))
        );
    }

    #[test]
    fn encode_decode_roundtrip_extremes() {
        for event in [
            RawEvent::new(0, 0, 0, 0, 0),
            RawEvent::new(u64::MAX, u64::MAX, u16::MAX, u16::MAX, i32::MIN),
            RawEvent::new(1_729_850_000, 999_999, EV_KEY, 113, i32::MAX),
        ] {
            assert_eq!(RawEvent::decode(&event.encode()).unwrap(), event);
        }
    }

    #[test]
    fn timestamp_combines_seconds_and_micros() {
        let event = RawEvent::new(100, 250_000, EV_KEY, 30, 1);
        assert!((event.timestamp() - 100.25).abs() < 1e-9);
    }

    #[test]
    fn key_state_requires_ev_key() {
        assert_eq!(RawEvent::new(0, 0, EV_KEY, 30, 1).key_state(), Some(KeyState::Down));
        assert_eq!(RawEvent::new(0, 0, EV_KEY, 30, 0).key_state(), Some(KeyState::Up));
        assert_eq!(RawEvent::new(0, 0, EV_KEY, 30, 2).key_state(), Some(KeyState::Repeat));
        assert_eq!(RawEvent::new(0, 0, EV_KEY, 30, 7).key_state(), None);
        // EV_MSC scan event carrying the same value
        assert_eq!(RawEvent::new(0, 0, 0x04, 4, 1).key_state(), None);
    }

    #[test]
    fn key_constructor_splits_timestamp() {
        let event = RawEvent::key(12.5, 30, KeyState::Down);
        assert_eq!(event.seconds, 12);
        assert_eq!(event.microseconds, 500_000);
        assert_eq!(event.key_state(), Some(KeyState::Down));
    }
}
