// Capture error types
//
// This module defines the error taxonomy for the sample-acquisition boundary.
// Acquisition failures are always recovered locally by the cycle; nothing
// here is fatal to the pipeline.

use log::error;
use std::fmt;

/// Log a capture error with its originating context
///
/// The cycle keeps the previous published reading on any capture failure,
/// so logging is the only externally visible effect.
pub fn log_capture_error(err: &CaptureError, context: &str) {
    error!("Capture error in {}: {}", context, err);
}

/// Sample-acquisition errors
///
/// These cover opening the capture device, stream format negotiation, and
/// block reads on the running stream.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// No usable input device present
    DeviceUnavailable,

    /// Failed to open the capture stream
    StreamOpenFailed { reason: String },

    /// Device produces a sample format the pipeline does not accept
    UnsupportedFormat { format: String },

    /// The bounded wait for a block elapsed with no samples
    ReadTimeout { waited_ms: u64 },

    /// The capture side hung up mid-stream
    Disconnected,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::DeviceUnavailable => {
                write!(f, "No default input device found")
            }
            CaptureError::StreamOpenFailed { reason } => {
                write!(f, "Failed to open capture stream: {}", reason)
            }
            CaptureError::UnsupportedFormat { format } => {
                write!(f, "Unsupported capture sample format: {}", format)
            }
            CaptureError::ReadTimeout { waited_ms } => {
                write!(f, "No samples within {} ms", waited_ms)
            }
            CaptureError::Disconnected => {
                write!(f, "Capture stream disconnected")
            }
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::StreamOpenFailed {
            reason: err.to_string(),
        }
    }
}
