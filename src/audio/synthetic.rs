// Synthetic waveform generation
//
// Deterministic test signals for exercising the classifier without audio
// files. White noise uses a fixed seed so repeated runs are bit-identical.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::audio::Waveform;
use crate::error::AnalysisError;

const NOISE_SEED: u64 = 0x5A5A_FFF0;

/// Supported deterministic waveform patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    Sine,
    Square,
    WhiteNoise,
    /// ±amplitude flipping every sample (maximal zero-crossing rate)
    Alternating,
    Silence,
}

/// Description of a synthetic signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSignal {
    pub pattern: SyntheticPattern,
    pub sample_rate: u32,
    pub duration_ms: u32,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
}

fn default_frequency_hz() -> f32 {
    220.0
}

fn default_amplitude() -> f32 {
    0.8
}

impl SyntheticSignal {
    pub fn new(pattern: SyntheticPattern, sample_rate: u32, duration_ms: u32) -> Self {
        Self {
            pattern,
            sample_rate,
            duration_ms,
            frequency_hz: default_frequency_hz(),
            amplitude: default_amplitude(),
        }
    }

    pub fn with_frequency(mut self, frequency_hz: f32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Number of samples this signal renders to
    pub fn sample_count(&self) -> usize {
        ((self.duration_ms as f64 / 1_000.0) * self.sample_rate as f64).round() as usize
    }

    /// Render the signal into a waveform
    pub fn render(&self) -> Result<Waveform, AnalysisError> {
        if self.sample_rate == 0 {
            return Err(AnalysisError::config("sample rate must be > 0"));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(AnalysisError::config(format!(
                "amplitude must be a non-negative number (got {})",
                self.amplitude
            )));
        }

        let len = self.sample_count();
        let step = self.frequency_hz.max(0.0) / self.sample_rate as f32;
        let amplitude = self.amplitude;

        let samples: Vec<f32> = match self.pattern {
            SyntheticPattern::Sine => {
                let mut phase = 0.0f32;
                (0..len)
                    .map(|_| {
                        let value = (2.0 * PI * phase).sin() * amplitude;
                        phase = (phase + step).fract();
                        value
                    })
                    .collect()
            }
            SyntheticPattern::Square => {
                let mut phase = 0.0f32;
                (0..len)
                    .map(|_| {
                        let value = if phase < 0.5 { amplitude } else { -amplitude };
                        phase = (phase + step).fract();
                        value
                    })
                    .collect()
            }
            SyntheticPattern::WhiteNoise => {
                let mut rng = StdRng::seed_from_u64(NOISE_SEED);
                (0..len)
                    .map(|_| {
                        if amplitude > 0.0 {
                            rng.gen_range(-amplitude..amplitude)
                        } else {
                            0.0
                        }
                    })
                    .collect()
            }
            SyntheticPattern::Alternating => (0..len)
                .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
                .collect(),
            SyntheticPattern::Silence => vec![0.0; len],
        };

        Waveform::new(samples, self.sample_rate)
    }
}
