// Audio module - waveform container and decoding collaborators
//
// The analysis core never parses audio containers. Decoders turn a path
// into a mono `Waveform`; synthetic generators build waveforms for tests
// and demos.

use std::path::Path;

use crate::error::AnalysisError;

pub mod resample;
pub mod synthetic;
pub mod wav;

pub use synthetic::{SyntheticPattern, SyntheticSignal};
pub use wav::{write_wav, WavDecoder};

/// Mono sample sequence with its sample rate
///
/// Immutable once built; analysis borrows the samples and never copies
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap decoded samples
    ///
    /// # Errors
    /// `InvalidConfiguration` if `sample_rate` is zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::config("sample rate must be > 0"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Time in seconds of the sample at `index`
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate as f64
    }
}

/// Decoding collaborator: resolves a path to a mono waveform
///
/// Implementations report every failure as `AnalysisError::DecodeFailure`.
pub trait AudioDecoder {
    fn decode(&self, path: &Path) -> Result<Waveform, AnalysisError>;
}
