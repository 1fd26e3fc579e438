//! Configuration for segmentation, classification and decoding
//!
//! All tunables live in explicit structs passed into the analysis calls.
//! Configuration can be loaded from a JSON file; missing fields take their
//! documented defaults, so a file only needs the values it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::classifier::ClassifierThresholds;
use crate::analysis::segmentation::frame_size_for;
use crate::error::AnalysisError;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub decode: DecodeOptions,
}

/// Segmentation and classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analysis window length in milliseconds
    pub window_size_ms: f32,
    /// Samples between consecutive frame starts
    pub hop_size_samples: usize,
    /// Static classification thresholds
    pub thresholds: ClassifierThresholds,
    /// Worker threads for the per-frame loop (1 = sequential)
    pub workers: usize,
}

impl AnalysisConfig {
    pub const DEFAULT_WINDOW_SIZE_MS: f32 = 20.0;
    pub const DEFAULT_HOP_SIZE_SAMPLES: usize = 512;

    /// Upper bound on `workers`; larger values are rejected
    pub const MAX_WORKERS: usize = 256;

    /// Check everything that does not depend on the sample rate
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.hop_size_samples == 0 {
            return Err(AnalysisError::config("hop size must be > 0"));
        }
        if self.workers == 0 || self.workers > Self::MAX_WORKERS {
            return Err(AnalysisError::config(format!(
                "workers must be between 1 and {} (got {})",
                Self::MAX_WORKERS,
                self.workers
            )));
        }
        if !self.window_size_ms.is_finite() || self.window_size_ms <= 0.0 {
            return Err(AnalysisError::config(format!(
                "window size must be a positive number of milliseconds (got {})",
                self.window_size_ms
            )));
        }
        self.thresholds.validate()
    }

    /// Check that this configuration can analyze audio at `sample_rate`
    ///
    /// Returns the derived frame size on success.
    pub fn validate_for(&self, sample_rate: u32) -> Result<usize, AnalysisError> {
        self.validate()?;
        frame_size_for(self.window_size_ms, sample_rate)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size_ms: Self::DEFAULT_WINDOW_SIZE_MS,
            hop_size_samples: Self::DEFAULT_HOP_SIZE_SAMPLES,
            thresholds: ClassifierThresholds::default(),
            workers: 1,
        }
    }
}

/// Decoder options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Resample decoded audio to this rate (None keeps the file's rate)
    pub target_sample_rate: Option<u32>,
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or
    /// malformed (a warning is logged in both cases).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_json_file(&path) {
            Ok(config) => {
                log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(err) => {
                log::warn!("[Config] {}. Using defaults.", err);
                Self::default()
            }
        }
    }

    /// Load configuration from JSON file, failing on any read or parse error
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            AnalysisError::config(format!("failed to read config file {:?}: {}", path, err))
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            AnalysisError::config(format!("failed to parse JSON from {:?}: {}", path, err))
        })
    }

    /// Validate everything that does not depend on the decoded audio
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.analysis.validate()?;
        if self.decode.target_sample_rate == Some(0) {
            return Err(AnalysisError::config("target sample rate must be > 0"));
        }
        Ok(())
    }
}
