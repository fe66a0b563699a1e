// Reading state - the published result of one estimation cycle
//
// Exactly one TuningReading is published at a time. The producer cycle
// replaces it wholesale once per block; display and network consumers take
// snapshots at arbitrary times and must never observe a value mixed from
// two cycles. ReadingCell guarantees that by swapping a single Arc under a
// lock rather than mutating fields in place.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::analysis::{nearest_string, note_for_frequency, GuitarString, NoteLabel};

/// Placeholder string name published when no string is matched
pub const NO_STRING: &str = "none";

/// The latest computed (frequency, note, string) triple
///
/// `frequency_hz` of `0.0` is the published no-pitch placeholder; the note
/// and string carry their own explicit unknown values alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct TuningReading {
    pub frequency_hz: f32,
    pub note: NoteLabel,
    pub nearest: Option<&'static GuitarString>,
}

impl TuningReading {
    /// The reading published before any cycle has completed
    pub fn unknown() -> Self {
        Self {
            frequency_hz: 0.0,
            note: NoteLabel::Unknown,
            nearest: None,
        }
    }

    /// Build a reading from one cycle's frequency estimate
    ///
    /// Both labels derive from the same estimate, so a reading is always
    /// internally consistent by construction.
    pub fn from_estimate(estimate: Option<f32>) -> Self {
        match estimate {
            Some(frequency_hz) if frequency_hz > 0.0 => Self {
                frequency_hz,
                note: note_for_frequency(frequency_hz),
                nearest: nearest_string(frequency_hz),
            },
            _ => Self::unknown(),
        }
    }

    /// Signed tuning offset against the matched string's target
    pub fn offset_hz(&self) -> Option<f32> {
        self.nearest
            .map(|string| self.frequency_hz - string.frequency)
    }

    /// Display name of the matched string, or the `none` placeholder
    pub fn string_name(&self) -> &'static str {
        self.nearest.map(|string| string.name).unwrap_or(NO_STRING)
    }
}

/// Process-wide cell holding the current reading
///
/// Cloning the cell clones the handle, not the reading; all clones observe
/// the same published value.
#[derive(Clone)]
pub struct ReadingCell {
    inner: Arc<RwLock<Arc<TuningReading>>>,
}

impl ReadingCell {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(TuningReading::unknown()))),
        }
    }

    /// Replace the published reading in a single swap
    ///
    /// Returns the stored snapshot so the producer can reuse it without
    /// re-reading the cell.
    pub fn publish(&self, reading: TuningReading) -> Arc<TuningReading> {
        let reading = Arc::new(reading);
        *self.inner.write().expect("reading cell poisoned") = Arc::clone(&reading);
        reading
    }

    /// Immutable snapshot of the current reading
    pub fn snapshot(&self) -> Arc<TuningReading> {
        Arc::clone(&self.inner.read().expect("reading cell poisoned"))
    }
}

impl Default for ReadingCell {
    fn default() -> Self {
        Self::new()
    }
}
