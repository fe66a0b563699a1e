//! TunerHandle: the repeating acquire-estimate-publish cycle.
//!
//! One handle owns the detector, the published reading cell, and a
//! broadcast channel for streaming consumers. Exactly one producer drives
//! the cycle at a time; display and HTTP readers take snapshots from any
//! thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::analysis::PitchDetector;
use crate::audio::SampleSource;
use crate::config::AppConfig;
use crate::error::log_capture_error;
use crate::state::{ReadingCell, TuningReading};

/// Result of one cycle attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A block was acquired and a new reading was published
    Published,
    /// Acquisition failed or came back empty; the previous reading stands
    Skipped,
}

/// Cycle counters surfaced on the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CycleStats {
    pub cycles: u64,
    pub skipped: u64,
}

/// TunerHandle orchestrates the estimation cycle and shared reading state.
pub struct TunerHandle {
    config: AppConfig,
    detector: PitchDetector,
    readings: ReadingCell,
    events: broadcast::Sender<TuningReading>,
    cycles: AtomicU64,
    skipped: AtomicU64,
}

impl TunerHandle {
    /// Create a handle from the platform config file (defaults on failure)
    pub fn new() -> Self {
        Self::from_config(AppConfig::load())
    }

    pub fn from_config(config: AppConfig) -> Self {
        let detector = PitchDetector::new(config.audio.sample_rate, &config.pitch);
        let (events, _) = broadcast::channel(64);

        Self {
            config,
            detector,
            readings: ReadingCell::new(),
            events,
            cycles: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the published reading cell
    pub fn readings(&self) -> ReadingCell {
        self.readings.clone()
    }

    /// Snapshot of the currently published reading
    pub fn snapshot(&self) -> Arc<TuningReading> {
        self.readings.snapshot()
    }

    /// Subscribe to the live reading stream
    pub fn subscribe(&self) -> broadcast::Receiver<TuningReading> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> CycleStats {
        CycleStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Run the estimate-map-publish stages on one acquired block
    ///
    /// Publication is a single swap of the whole reading; concurrent
    /// readers see either the previous cycle's value or this one, never a
    /// mixture.
    pub fn process_block(&self, samples: &[i32]) -> Arc<TuningReading> {
        let estimate = self.detector.detect(samples);
        let reading = TuningReading::from_estimate(estimate);

        debug!(
            "cycle: {:.2} Hz | note {} | string {}",
            reading.frequency_hz,
            reading.note,
            reading.string_name()
        );

        // Streaming consumers are best-effort; the cell is the source of truth
        let _ = self.events.send(reading.clone());
        let published = self.readings.publish(reading);
        self.cycles.fetch_add(1, Ordering::Relaxed);
        published
    }

    /// Drive one full cycle: acquire, estimate, map, publish
    ///
    /// A failed or empty acquisition leaves the previous reading published
    /// and never aborts the loop.
    pub fn run_cycle(&self, source: &mut dyn SampleSource, block: &mut [i32]) -> CycleOutcome {
        match source.read_block(block) {
            Ok(0) => {
                warn!("Empty capture read; keeping previous reading");
                self.skipped.fetch_add(1, Ordering::Relaxed);
                CycleOutcome::Skipped
            }
            Ok(n) => {
                self.process_block(&block[..n]);
                CycleOutcome::Published
            }
            Err(err) => {
                log_capture_error(&err, "run_cycle");
                self.skipped.fetch_add(1, Ordering::Relaxed);
                CycleOutcome::Skipped
            }
        }
    }

    /// Repeat the cycle until the stop flag is raised
    pub fn run_until(&self, source: &mut dyn SampleSource, stop: &AtomicBool) {
        let mut block = vec![0i32; self.config.audio.block_size];
        while !stop.load(Ordering::Relaxed) {
            self.run_cycle(source, &mut block);
        }
    }
}

impl Default for TunerHandle {
    fn default() -> Self {
        Self::new()
    }
}
