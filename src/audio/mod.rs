// Audio module - sample acquisition boundary
//
// The pipeline consumes blocks of signed 32-bit samples through the
// SampleSource trait. The live microphone backend and the deterministic
// fixture sources all sit behind the same seam, so the cycle never knows
// which one is feeding it.

use crate::error::CaptureError;

pub mod cpal;
pub mod fixtures;

pub use cpal::CpalSource;
pub use fixtures::{SyntheticPattern, SyntheticSource, WavSource};

/// Trait implemented by block-oriented sample producers
///
/// `read_block` fills as much of `buf` as it can within the source's
/// bounded wait and returns the number of samples written. `Ok(0)` means
/// the source had nothing to deliver (an exhausted fixture, for example);
/// callers must treat it like an error and keep their previous state.
pub trait SampleSource {
    fn read_block(&mut self, buf: &mut [i32]) -> Result<usize, CaptureError>;
}
