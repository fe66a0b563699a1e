//! Configuration management for capture and pipeline parameters
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling parameter changes without recompilation. The capture format,
//! autocorrelation search range, and presentation scaling can all be
//! adjusted via the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub pitch: PitchConfig,
    pub display: DisplayConfig,
    pub http: HttpConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Samples acquired per estimation cycle
    pub block_size: usize,
    /// Bounded wait for one block acquisition
    pub read_timeout_ms: u64,
    /// Ring capacity between the capture callback and the cycle thread,
    /// expressed in blocks
    pub queue_blocks: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            block_size: 1024,
            read_timeout_ms: 500,
            queue_blocks: 8,
        }
    }
}

/// Autocorrelation pitch estimator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchConfig {
    /// Lower bound of the detectable range (longest candidate lag)
    pub min_frequency_hz: u32,
    /// Upper bound of the detectable range (shortest candidate lag)
    pub max_frequency_hz: u32,
    /// Right shift applied to each sample before multiplication. Derived
    /// from the capture bit depth and expected signal amplitude; must match
    /// the sample format, not be rederived per block.
    pub input_shift_bits: u32,
    /// Optional correlation-peak floor. `None` preserves the reference
    /// behavior: any strictly positive peak wins, even under noise.
    #[serde(default)]
    pub min_peak_level: Option<f64>,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            // 80-400 Hz covers all six open strings with margin
            min_frequency_hz: 80,
            max_frequency_hz: 400,
            input_shift_bits: 14,
            min_peak_level: None,
        }
    }
}

/// Status-line rendering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Cells of marker travel per Hz of tuning offset
    pub sensitivity: f32,
    /// Marker travel limit on each side of center, in cells
    pub half_width: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sensitivity: 4.0,
            half_width: 30,
        }
    }
}

/// Network responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address for the read-only HTTP responder
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            pitch: PitchConfig::default(),
            display: DisplayConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing or
    /// fails to parse.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default assets location
    pub fn load() -> Self {
        Self::load_from_file("assets/tuner_config.json")
    }
}
