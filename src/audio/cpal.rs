// Live microphone capture via cpal
//
// The capture callback converts incoming f32 frames to full-scale i32
// samples and pushes them through a lock-free SPSC ring to the cycle
// thread. The bounded block wait lives entirely on the consumer side.

use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, PopError, RingBuffer};

use super::SampleSource;
use crate::config::AudioConfig;
use crate::error::CaptureError;

/// Default-input-device sample source
///
/// Holds the running input stream; dropping the source stops capture.
/// cpal streams are not `Send`, so construct the source on the thread
/// that will read from it.
pub struct CpalSource {
    _stream: cpal::Stream,
    consumer: Consumer<i32>,
    timeout: Duration,
}

impl CpalSource {
    /// Open the default input device and start capturing
    pub fn open(config: &AudioConfig) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)?;

        let supported =
            device
                .default_input_config()
                .map_err(|e| CaptureError::StreamOpenFailed {
                    reason: format!("Failed to get default input config: {:?}", e),
                })?;

        let stream_config: cpal::StreamConfig = supported.clone().into();
        let channels = stream_config.channels as usize;

        let capacity = config.block_size * config.queue_blocks.max(1);
        let (mut producer, consumer) = RingBuffer::new(capacity);

        let err_fn = |err| log::error!("Input stream error: {}", err);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Take the first channel of each frame; a full ring
                    // drops samples rather than blocking the callback
                    for frame in data.chunks(channels) {
                        let sample = frame.first().copied().unwrap_or(0.0);
                        let value = (sample.clamp(-1.0, 1.0) * i32::MAX as f32) as i32;
                        let _ = producer.push(value);
                    }
                },
                err_fn,
                None,
            ),
            other => {
                return Err(CaptureError::UnsupportedFormat {
                    format: format!("{:?}", other),
                })
            }
        }
        .map_err(|e| CaptureError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })?;

        stream.play().map_err(|e| CaptureError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })?;

        log::info!(
            "Capture stream open: {} Hz, {} channel(s), reading first channel",
            stream_config.sample_rate.0,
            channels
        );

        Ok(Self {
            _stream: stream,
            consumer,
            timeout: Duration::from_millis(config.read_timeout_ms),
        })
    }
}

impl SampleSource for CpalSource {
    fn read_block(&mut self, buf: &mut [i32]) -> Result<usize, CaptureError> {
        let deadline = Instant::now() + self.timeout;
        let mut filled = 0usize;

        while filled < buf.len() {
            match self.consumer.pop() {
                Ok(sample) => {
                    buf[filled] = sample;
                    filled += 1;
                }
                Err(PopError::Empty) => {
                    if self.consumer.is_abandoned() {
                        return Err(CaptureError::Disconnected);
                    }
                    if Instant::now() >= deadline {
                        if filled == 0 {
                            return Err(CaptureError::ReadTimeout {
                                waited_ms: self.timeout.as_millis() as u64,
                            });
                        }
                        // Partial block: deliver what arrived in time
                        break;
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }

        Ok(filled)
    }
}
