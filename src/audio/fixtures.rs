//! Deterministic sample sources for offline analysis and tests.
//!
//! These feed the same pipeline as the live microphone without touching
//! audio hardware: a WAV loader for recorded material and a synthetic
//! generator for known waveforms.

use std::f32::consts::PI;
use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::SampleSource;
use crate::error::CaptureError;

/// Default synthetic amplitude: loud enough to survive the estimator's
/// input shift with headroom below full scale
pub const DEFAULT_AMPLITUDE: i32 = 1 << 28;

/// PCM block source backed by a WAV file
///
/// Multi-channel files are downmixed to mono by averaging; samples are
/// rescaled to full 32-bit range. The source delivers blocks until the
/// file is exhausted, then returns `Ok(0)`.
pub struct WavSource {
    samples: Vec<i32>,
    sample_rate: u32,
    cursor: usize,
}

impl WavSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let mut reader =
            hound::WavReader::open(path).map_err(|err| CaptureError::StreamOpenFailed {
                reason: format!("failed to open {}: {err}", path.display()),
            })?;
        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(CaptureError::UnsupportedFormat {
                format: format!("{} has zero channels", path.display()),
            });
        }

        let read_err = |err: hound::Error| CaptureError::StreamOpenFailed {
            reason: format!("error reading {}: {err}", path.display()),
        };

        let samples: Vec<i32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|sample| {
                    sample
                        .map(|v| (v.clamp(-1.0, 1.0) * i32::MAX as f32) as i32)
                        .map_err(read_err)
                })
                .collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => match spec.bits_per_sample {
                16 => reader
                    .samples::<i16>()
                    .map(|sample| sample.map(|v| (v as i32) << 16).map_err(read_err))
                    .collect::<Result<_, _>>()?,
                24 => reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v << 8).map_err(read_err))
                    .collect::<Result<_, _>>()?,
                32 => reader
                    .samples::<i32>()
                    .map(|sample| sample.map_err(read_err))
                    .collect::<Result<_, _>>()?,
                bits => {
                    return Err(CaptureError::UnsupportedFormat {
                        format: format!("{} bits per sample in {}", bits, path.display()),
                    })
                }
            },
        };

        let mono = if spec.channels == 1 {
            samples
        } else {
            samples
                .chunks(spec.channels as usize)
                .map(|frame| {
                    let sum: i64 = frame.iter().map(|&v| v as i64).sum();
                    (sum / frame.len() as i64) as i32
                })
                .collect()
        };

        Ok(Self {
            samples: mono,
            sample_rate: spec.sample_rate,
            cursor: 0,
        })
    }

    /// Sample rate the file was recorded at
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl SampleSource for WavSource {
    fn read_block(&mut self, buf: &mut [i32]) -> Result<usize, CaptureError> {
        if self.cursor >= self.samples.len() {
            return Ok(0);
        }
        let n = (self.samples.len() - self.cursor).min(buf.len());
        buf[..n].copy_from_slice(&self.samples[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }
}

/// Supported deterministic waveform patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticPattern {
    Sine,
    Square,
    Silence,
    WhiteNoise,
}

/// Endless generator of a fixed waveform
///
/// Noise uses a seeded generator, so a given source always produces the
/// same sample stream.
pub struct SyntheticSource {
    pattern: SyntheticPattern,
    frequency_hz: f32,
    amplitude: i32,
    sample_rate: u32,
    phase: f32,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(pattern: SyntheticPattern, frequency_hz: f32, sample_rate: u32) -> Self {
        Self {
            pattern,
            frequency_hz: frequency_hz.max(1.0),
            amplitude: DEFAULT_AMPLITUDE,
            sample_rate,
            phase: 0.0,
            rng: StdRng::seed_from_u64(0x7E57_0001),
        }
    }

    pub fn with_amplitude(mut self, amplitude: i32) -> Self {
        self.amplitude = amplitude;
        self
    }

    fn next_sample(&mut self) -> i32 {
        match self.pattern {
            SyntheticPattern::Sine => {
                let value = (2.0 * PI * self.phase).sin() * self.amplitude as f32;
                self.advance_phase();
                value as i32
            }
            SyntheticPattern::Square => {
                let value = if self.phase < 0.5 {
                    self.amplitude
                } else {
                    -self.amplitude
                };
                self.advance_phase();
                value
            }
            SyntheticPattern::Silence => 0,
            SyntheticPattern::WhiteNoise => self.rng.gen_range(-self.amplitude..=self.amplitude),
        }
    }

    fn advance_phase(&mut self) {
        self.phase += self.frequency_hz / self.sample_rate as f32;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }
}

impl SampleSource for SyntheticSource {
    fn read_block(&mut self, buf: &mut [i32]) -> Result<usize, CaptureError> {
        for slot in buf.iter_mut() {
            *slot = self.next_sample();
        }
        Ok(buf.len())
    }
}
