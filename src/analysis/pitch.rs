// Pitch module - autocorrelation frequency estimation
//
// Estimates the fundamental frequency of one sample block by scanning
// candidate periods (lags) and keeping the lag whose self-similarity sum is
// greatest. The guitar's harmonic-rich, quasi-periodic waveform produces a
// clear correlation peak at the true period, so no windowing or transform
// stage is needed.

use crate::config::PitchConfig;

/// Autocorrelation pitch detector
///
/// Stateless between calls; the output is fully determined by the input
/// block and the construction parameters.
pub struct PitchDetector {
    sample_rate: u32,
    /// Shortest candidate period, `sample_rate / max_frequency_hz`
    min_lag: usize,
    /// Longest candidate period, `sample_rate / min_frequency_hz`
    max_lag: usize,
    /// Right shift applied to each sample before multiplication, keeping
    /// the products inside comfortable accumulator range
    shift_bits: u32,
    /// Optional opt-in correlation floor; `None` preserves the default
    /// behavior of accepting any strictly positive peak
    min_peak_level: Option<f64>,
}

impl PitchDetector {
    /// Create a detector for a fixed sample rate and search range
    pub fn new(sample_rate: u32, config: &PitchConfig) -> Self {
        Self {
            sample_rate,
            min_lag: (sample_rate / config.max_frequency_hz) as usize,
            max_lag: (sample_rate / config.min_frequency_hz) as usize,
            shift_bits: config.input_shift_bits,
            min_peak_level: config.min_peak_level,
        }
    }

    /// Estimate the fundamental frequency of one block
    ///
    /// Returns `None` when no lag accumulates a positive correlation sum
    /// (silence, or a block shorter than the shortest candidate period).
    pub fn detect(&self, samples: &[i32]) -> Option<f32> {
        let max_lag = self.max_lag.min(samples.len().saturating_sub(1));

        let mut best_lag = 0usize;
        let mut best_sum = 0.0f64;

        for lag in self.min_lag.max(1)..=max_lag {
            let mut sum = 0.0f64;
            for i in 0..samples.len() - lag {
                let a = (samples[i] >> self.shift_bits) as f64;
                let b = (samples[i + lag] >> self.shift_bits) as f64;
                sum += a * b;
            }
            // Strictly greater: the first maximal lag wins ties, and a lag
            // only wins at all with a positive sum
            if sum > best_sum {
                best_sum = sum;
                best_lag = lag;
            }
        }

        if best_lag == 0 {
            return None;
        }
        if let Some(floor) = self.min_peak_level {
            if best_sum < floor {
                return None;
            }
        }

        Some(self.sample_rate as f32 / best_lag as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const SAMPLE_RATE: u32 = 16_000;
    // Loud enough that >>14 leaves plenty of signal
    const AMPLITUDE: f64 = (1i64 << 28) as f64;

    fn detector() -> PitchDetector {
        PitchDetector::new(SAMPLE_RATE, &PitchConfig::default())
    }

    fn sine_block(period_samples: usize, len: usize) -> Vec<i32> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * PI * (i % period_samples) as f64 / period_samples as f64;
                (phase.sin() * AMPLITUDE) as i32
            })
            .collect()
    }

    #[test]
    fn test_detects_known_period() {
        // Period of 100 samples at 16 kHz is 160 Hz, inside the search range
        let block = sine_block(100, 1024);
        let freq = detector().detect(&block).expect("periodic signal");

        // Within one lag step of the true period
        let lower = SAMPLE_RATE as f32 / 101.0;
        let upper = SAMPLE_RATE as f32 / 99.0;
        assert!(
            freq >= lower && freq <= upper,
            "expected ~160 Hz, got {freq}"
        );
    }

    #[test]
    fn test_detects_low_string_period() {
        // 200 samples ~ 80 Hz, the bottom of the search range
        let block = sine_block(200, 1024);
        let freq = detector().detect(&block).expect("periodic signal");
        let lower = SAMPLE_RATE as f32 / 201.0;
        let upper = SAMPLE_RATE as f32 / 199.0;
        assert!(freq >= lower && freq <= upper, "expected ~80 Hz, got {freq}");
    }

    #[test]
    fn test_silence_yields_no_pitch() {
        let block = vec![0i32; 1024];
        assert_eq!(detector().detect(&block), None);
    }

    #[test]
    fn test_output_is_deterministic() {
        let block = sine_block(137, 1024);
        let first = detector().detect(&block);
        let second = detector().detect(&block);
        assert_eq!(first, second);

        // Degenerate constant block: whatever the answer, it must repeat
        let constant = vec![1 << 20; 1024];
        assert_eq!(detector().detect(&constant), detector().detect(&constant));
    }

    #[test]
    fn test_short_block_yields_no_pitch() {
        // Shorter than the shortest candidate period
        let block = sine_block(100, 30);
        assert_eq!(detector().detect(&block), None);
    }

    #[test]
    fn test_peak_floor_rejects_quiet_signal() {
        let gated = PitchDetector::new(
            SAMPLE_RATE,
            &PitchConfig {
                min_peak_level: Some(f64::MAX),
                ..PitchConfig::default()
            },
        );
        let block = sine_block(100, 1024);
        assert_eq!(gated.detect(&block), None);
        // Default config keeps the reference behavior
        assert!(detector().detect(&block).is_some());
    }
}
