// WAV decoding and encoding via hound
//
// Float WAV data is passed through; integer PCM is scaled by
// `2^(bits-1) - 1` so full scale maps to ±1.0. Multi-channel files are
// mixed down to mono by averaging each interleaved frame.

use std::path::Path;

use crate::audio::resample::resample;
use crate::audio::{AudioDecoder, Waveform};
use crate::config::DecodeOptions;
use crate::error::AnalysisError;

/// `hound`-backed WAV decoder
#[derive(Debug, Clone, Default)]
pub struct WavDecoder {
    options: DecodeOptions,
}

impl WavDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<Waveform, AnalysisError> {
        let (samples, sample_rate) = read_wav(path)?;

        let waveform = match self.options.target_sample_rate {
            Some(target) if target != sample_rate => {
                tracing::debug!(
                    "[WavDecoder] Resampling {} from {} Hz to {} Hz",
                    path.display(),
                    sample_rate,
                    target
                );
                resample(&samples, sample_rate, target)
                    .and_then(|resampled| Waveform::new(resampled, target))
            }
            _ => Waveform::new(samples, sample_rate),
        };

        waveform.map_err(|err| AnalysisError::decode(format!("{}: {}", path.display(), err)))
    }
}

fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), AnalysisError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| AnalysisError::decode(format!("failed to open {}: {err}", path.display())))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AnalysisError::decode(format!(
            "{} has zero channels",
            path.display()
        )));
    }

    let read_err =
        |err: hound::Error| AnalysisError::decode(format!("error reading {}: {err}", path.display()));

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map_err(read_err))
            .collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            8 | 16 | 24 | 32 => {
                let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / max).map_err(read_err))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            bits => {
                return Err(AnalysisError::decode(format!(
                    "unsupported bits_per_sample={} for {}",
                    bits,
                    path.display()
                )))
            }
        },
    };

    if spec.channels == 1 {
        return Ok((samples, spec.sample_rate));
    }

    let mut mono = Vec::with_capacity(samples.len() / spec.channels as usize);
    for chunk in samples.chunks(spec.channels as usize) {
        let sum: f32 = chunk.iter().copied().sum();
        mono.push(sum / spec.channels as f32);
    }

    Ok((mono, spec.sample_rate))
}

/// Write a waveform as a 32-bit float mono WAV file
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in waveform.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}
