//! Integration tests for the full tuner pipeline.
//!
//! These drive the public API end to end: a deterministic sample source
//! feeds the cycle, and the published reading state is checked the way the
//! display and network consumers would read it.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use guitar_tuner::analysis::{nearest_string, note_for_frequency};
use guitar_tuner::audio::{SampleSource, SyntheticPattern, SyntheticSource};
use guitar_tuner::config::AppConfig;
use guitar_tuner::error::CaptureError;
use guitar_tuner::{CycleOutcome, TunerHandle, TuningReading};

struct FlakySource {
    inner: SyntheticSource,
    reads: u32,
}

impl SampleSource for FlakySource {
    fn read_block(&mut self, buf: &mut [i32]) -> Result<usize, CaptureError> {
        self.reads += 1;
        // Every third read fails like a transient driver error
        if self.reads % 3 == 0 {
            return Err(CaptureError::ReadTimeout { waited_ms: 500 });
        }
        self.inner.read_block(buf)
    }
}

fn sine_handle_and_source(frequency_hz: f32) -> (TunerHandle, SyntheticSource) {
    let config = AppConfig::default();
    let source = SyntheticSource::new(SyntheticPattern::Sine, frequency_hz, config.audio.sample_rate);
    (TunerHandle::from_config(config), source)
}

#[test]
fn test_open_string_is_recognized_end_to_end() {
    let (handle, mut source) = sine_handle_and_source(110.0);
    let mut block = vec![0i32; handle.config().audio.block_size];

    for _ in 0..4 {
        assert_eq!(
            handle.run_cycle(&mut source, &mut block),
            CycleOutcome::Published
        );
    }

    let reading = handle.snapshot();
    assert_eq!(reading.string_name(), "A2 (5ª)");
    assert_eq!(reading.note.to_string(), "A2");
    assert!(
        (reading.frequency_hz - 110.0).abs() < 1.0,
        "estimate {} Hz too far from 110 Hz",
        reading.frequency_hz
    );
    let offset = reading.offset_hz().expect("matched string");
    assert!(offset.abs() < 1.0);
}

#[test]
fn test_flaky_acquisition_never_clears_the_reading() {
    let config = AppConfig::default();
    let handle = TunerHandle::from_config(config.clone());
    let mut source = FlakySource {
        inner: SyntheticSource::new(SyntheticPattern::Sine, 196.0, config.audio.sample_rate),
        reads: 0,
    };
    let mut block = vec![0i32; config.audio.block_size];

    let mut last_good = None;
    for _ in 0..9 {
        match handle.run_cycle(&mut source, &mut block) {
            CycleOutcome::Published => last_good = Some(handle.snapshot()),
            CycleOutcome::Skipped => {
                let current = handle.snapshot();
                let expected = last_good.as_ref().expect("a published reading before skip");
                assert_eq!(current.frequency_hz, expected.frequency_hz);
                assert_eq!(current.string_name(), expected.string_name());
            }
        }
    }

    assert_eq!(handle.stats().skipped, 3);
    assert_eq!(handle.stats().cycles, 6);
}

#[test]
fn test_run_until_honors_stop_flag() {
    let (handle, source) = sine_handle_and_source(82.41);
    let handle = Arc::new(handle);
    let stop = Arc::new(AtomicBool::new(false));

    let producer = {
        let handle = Arc::clone(&handle);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut source = source;
            handle.run_until(&mut source, &stop);
        })
    };

    while handle.stats().cycles < 3 {
        thread::yield_now();
    }
    stop.store(true, Ordering::Relaxed);
    producer.join().expect("producer thread");

    assert_eq!(handle.snapshot().string_name(), "E2 (6ª)");
}

#[test]
fn test_concurrent_readers_see_whole_cycles_only() {
    // Alternate between two frequencies whose labels differ everywhere, so
    // any mixed-cycle value is detectable as an inconsistent triple.
    let handle = Arc::new(TunerHandle::from_config(AppConfig::default()));
    let done = Arc::new(AtomicBool::new(false));
    let published = Arc::new(AtomicU32::new(0));

    let producer = {
        let handle = Arc::clone(&handle);
        let done = Arc::clone(&done);
        let published = Arc::clone(&published);
        thread::spawn(move || {
            let frequencies = [82.41f32, 329.63];
            for i in 0..2_000u32 {
                let estimate = frequencies[(i % 2) as usize];
                handle.readings().publish(TuningReading::from_estimate(Some(estimate)));
                published.fetch_add(1, Ordering::Relaxed);
            }
            done.store(true, Ordering::Relaxed);
        })
    };

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let handle = Arc::clone(&handle);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let reading = handle.readings().snapshot();
                    if reading.frequency_hz == 0.0 {
                        continue; // initial unknown reading
                    }
                    // A coherent reading's labels always re-derive from its
                    // own frequency
                    assert_eq!(reading.note, note_for_frequency(reading.frequency_hz));
                    assert_eq!(
                        reading.nearest.map(|s| s.name),
                        nearest_string(reading.frequency_hz).map(|s| s.name)
                    );
                }
            })
        })
        .collect();

    producer.join().expect("producer thread");
    for reader in readers {
        reader.join().expect("reader thread");
    }
    assert_eq!(published.load(Ordering::Relaxed), 2_000);
}

#[test]
fn test_noise_block_output_is_deterministic() {
    let config = AppConfig::default();
    let mut source_a =
        SyntheticSource::new(SyntheticPattern::WhiteNoise, 110.0, config.audio.sample_rate);
    let mut source_b =
        SyntheticSource::new(SyntheticPattern::WhiteNoise, 110.0, config.audio.sample_rate);
    let handle_a = TunerHandle::from_config(config.clone());
    let handle_b = TunerHandle::from_config(config.clone());
    let mut block = vec![0i32; config.audio.block_size];

    handle_a.run_cycle(&mut source_a, &mut block);
    let first = handle_a.snapshot();
    handle_b.run_cycle(&mut source_b, &mut block);
    let second = handle_b.snapshot();

    // Noise gives no musically meaningful answer, but identical blocks must
    // yield identical readings
    assert_eq!(first.frequency_hz, second.frequency_hz);
    assert_eq!(first.string_name(), second.string_name());
}
