//! Single event log file reader

use super::CorpusError;
use crate::keyboard::{RawEvent, RECORD_SIZE};
use crate::utils::TimeWindow;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Decode records from a byte stream until fewer than one record remains.
///
/// A trailing partial record is discarded. Any other read error stops
/// decoding and is returned together with the events decoded so far.
pub fn decode_records<R: Read>(mut reader: R) -> (Vec<RawEvent>, Option<io::Error>) {
    let mut events = Vec::new();
    let mut buf = [0u8; RECORD_SIZE];

    loop {
        match reader.read_exact(&mut buf) {
            Ok(()) => match RawEvent::decode(&buf) {
                Ok(event) => events.push(event),
                Err(e) => return (events, Some(io::Error::new(io::ErrorKind::InvalidData, e))),
            },
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return (events, Some(e)),
        }
    }

    (events, None)
}

/// Read every record of a file in on-disk order
pub fn read_events(path: &Path) -> Result<Vec<RawEvent>, CorpusError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CorpusError::FileVanished(path.to_path_buf())
        } else {
            CorpusError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let (events, error) = decode_records(BufReader::new(file));
    if let Some(e) = error {
        warn!(
            "Stopped reading {} after {} events: {}",
            path.display(),
            events.len(),
            e
        );
    }
    debug!("Read {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Read the records of a file whose timestamps fall inside the window
pub fn read_events_between(path: &Path, window: TimeWindow) -> Result<Vec<RawEvent>, CorpusError> {
    let mut events = read_events(path)?;
    events.retain(|event| window.contains(event.timestamp()));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{KeyState, EV_KEY};
    use crate::test_helpers::{temp_dir, write_events};
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn decode_records_in_order() {
        let events: Vec<RawEvent> = (0..5)
            .map(|i| RawEvent::new(100 + i, 0, EV_KEY, 30, 1))
            .collect();
        let bytes: Vec<u8> = events.iter().flat_map(|e| e.encode()).collect();

        let (decoded, error) = decode_records(Cursor::new(bytes));
        assert!(error.is_none());
        assert_eq!(decoded, events);
    }

    #[test]
    fn partial_trailing_record_discarded() {
        let event = RawEvent::new(1, 2, EV_KEY, 30, 1);
        for remainder in 0..RECORD_SIZE {
            let mut bytes: Vec<u8> = Vec::new();
            for _ in 0..3 {
                bytes.extend_from_slice(&event.encode());
            }
            bytes.extend(std::iter::repeat(0xAB).take(remainder));

            let (decoded, error) = decode_records(Cursor::new(bytes));
            assert!(error.is_none());
            assert_eq!(decoded.len(), 3, "remainder {}", remainder);
        }
    }

    /// Yields its bytes, then fails instead of reporting end of stream
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device unplugged")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn read_error_keeps_events_decoded_before_it() {
        let event = RawEvent::new(7, 0, EV_KEY, 30, 1);
        let mut bytes: Vec<u8> = Vec::new();
        for _ in 0..2 {
            bytes.extend_from_slice(&event.encode());
        }
        bytes.extend_from_slice(&event.encode()[..RECORD_SIZE / 2]);

        let (decoded, error) = decode_records(FailingReader {
            data: Cursor::new(bytes),
        });
        assert_eq!(decoded, vec![event, event]);
        let error = error.expect("read error should be reported");
        assert_eq!(error.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn empty_stream_has_no_events() {
        let (decoded, error) = decode_records(Cursor::new(Vec::new()));
        assert!(decoded.is_empty());
        assert!(error.is_none());
    }

    #[test]
    fn read_file_with_window() {
        let dir = temp_dir("file-window");
        let path = dir.join("events.bin");
        write_events(
            &path,
            &[
                RawEvent::key(9.0, 30, KeyState::Down),
                RawEvent::key(10.0, 30, KeyState::Up),
                RawEvent::key(15.0, 31, KeyState::Down),
                RawEvent::key(20.0, 31, KeyState::Up),
            ],
        );

        let events = read_events_between(&path, TimeWindow::new(10.0, 20.0)).unwrap();
        let stamps: Vec<f64> = events.iter().map(RawEvent::timestamp).collect();
        assert_eq!(stamps, vec![10.0, 15.0]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_vanished() {
        let path = Path::new("/nonexistent/keystroke-stats/events.bin");
        match read_events(path) {
            Err(CorpusError::FileVanished(p)) => assert_eq!(p, path),
            other => panic!("expected FileVanished, got {:?}", other),
        }
    }
}
