// Notes module - equal-temperament note labeling
//
// Maps a frequency estimate onto the 12-tone equal-temperament scale
// referenced to A4 = 440 Hz. Note numbers follow the convention where
// number 69 is A4 and number 0 is C in octave -1.

use serde::{Serialize, Serializer};
use std::fmt;

/// Chromatic pitch-class names, starting at C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Musical label for a frequency estimate
///
/// `Unknown` is the explicit no-pitch label and renders as `??`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLabel {
    Unknown,
    Pitched { name: &'static str, octave: i32 },
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteLabel::Unknown => write!(f, "??"),
            NoteLabel::Pitched { name, octave } => write!(f, "{}{}", name, octave),
        }
    }
}

impl Serialize for NoteLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label a frequency with its nearest equal-temperament note
///
/// Total over all inputs: non-positive frequencies map to
/// [`NoteLabel::Unknown`], everything else rounds (half away from zero) to
/// the nearest note number.
pub fn note_for_frequency(frequency_hz: f32) -> NoteLabel {
    if frequency_hz <= 0.0 {
        return NoteLabel::Unknown;
    }

    let number = (12.0 * (frequency_hz / 440.0).log2() + 69.0).round() as i32;
    // Euclidean division keeps the mapping total for sub-audio frequencies
    let octave = number.div_euclid(12) - 1;
    let class = number.rem_euclid(12) as usize;

    NoteLabel::Pitched {
        name: NOTE_NAMES[class],
        octave,
    }
}
