// Strings module - nearest open-string matching
//
// Fixed reference table for standard six-string guitar tuning. The table is
// immutable and defined once; matching is a linear scan for the minimum
// absolute frequency difference, first entry winning exact ties.

use serde::Serialize;

/// One open-string reference pitch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuitarString {
    /// Display name: note plus string ordinal
    pub name: &'static str,
    /// Target frequency in Hz
    pub frequency: f32,
}

/// Standard tuning reference table, low to high
pub const GUITAR_STRINGS: [GuitarString; 6] = [
    GuitarString {
        name: "E2 (6ª)",
        frequency: 82.41,
    },
    GuitarString {
        name: "A2 (5ª)",
        frequency: 110.00,
    },
    GuitarString {
        name: "D3 (4ª)",
        frequency: 146.83,
    },
    GuitarString {
        name: "G3 (3ª)",
        frequency: 196.00,
    },
    GuitarString {
        name: "B3 (2ª)",
        frequency: 246.94,
    },
    GuitarString {
        name: "E4 (1ª)",
        frequency: 329.63,
    },
];

/// Find the reference string nearest to a frequency
///
/// Non-positive frequencies have no nearest string. Ties resolve to the
/// first minimal entry in table order.
pub fn nearest_string(frequency_hz: f32) -> Option<&'static GuitarString> {
    if frequency_hz <= 0.0 {
        return None;
    }

    GUITAR_STRINGS.iter().min_by(|a, b| {
        let diff_a = (a.frequency - frequency_hz).abs();
        let diff_b = (b.frequency - frequency_hz).abs();
        diff_a
            .partial_cmp(&diff_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_self_match() {
        for string in &GUITAR_STRINGS {
            let matched = nearest_string(string.frequency).expect("positive frequency");
            assert_eq!(matched.name, string.name);
            assert_eq!(matched.frequency - string.frequency, 0.0);
        }
    }

    #[test]
    fn test_low_e_catches_nearby_sharp() {
        // 85 Hz is sharp of E2 but still nearer to it than to A2
        let matched = nearest_string(85.0).unwrap();
        assert_eq!(matched.name, "E2 (6ª)");
    }

    #[test]
    fn test_midpoint_sides() {
        // The E2/A2 midpoint is ~96.205 Hz
        assert_eq!(nearest_string(96.2).unwrap().name, "E2 (6ª)");
        assert_eq!(nearest_string(96.21).unwrap().name, "A2 (5ª)");
    }

    #[test]
    fn test_no_pitch_has_no_string() {
        assert!(nearest_string(0.0).is_none());
        assert!(nearest_string(-1.0).is_none());
    }

    #[test]
    fn test_out_of_range_still_matches_extremes() {
        assert_eq!(nearest_string(40.0).unwrap().name, "E2 (6ª)");
        assert_eq!(nearest_string(1000.0).unwrap().name, "E4 (1ª)");
    }
}
