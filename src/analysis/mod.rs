// Analysis module - pitch estimation pipeline
//
// This module turns one block of raw capture samples into musically
// meaningful labels:
//
// - PitchDetector: block of i32 samples -> frequency estimate (Hz)
// - notes: frequency -> equal-temperament note label
// - strings: frequency -> nearest open guitar string

pub mod notes;
pub mod pitch;
pub mod strings;

pub use notes::{note_for_frequency, NoteLabel, NOTE_NAMES};
pub use pitch::PitchDetector;
pub use strings::{nearest_string, GuitarString, GUITAR_STRINGS};
