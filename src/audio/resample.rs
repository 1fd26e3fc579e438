// Resample - band-limited sample rate conversion via rubato
//
// Whole-buffer conversion with a windowed-sinc `SincFixedIn` resampler.
// When downsampling, rubato scales the sinc cutoff to the new Nyquist
// frequency, so content above it is filtered out instead of folding back
// into the band (which would inflate zero-crossing rates).

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::AnalysisError;

/// Input frames per rubato call
const CHUNK_SIZE: usize = 1024;

fn sinc_parameters() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Resample mono `samples` from `from_rate` to `to_rate`
///
/// Output length is `round(len * to_rate / from_rate)` and is aligned with
/// the input (the filter delay is removed). Equal rates return the input
/// unchanged.
///
/// # Errors
/// `InvalidConfiguration` for a zero rate, `DecodeFailure` if rubato
/// rejects the conversion.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AnalysisError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AnalysisError::config(format!(
            "cannot resample {} Hz -> {} Hz",
            from_rate, to_rate
        )));
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, sinc_parameters(), CHUNK_SIZE, 1)
        .map_err(|e| AnalysisError::decode(format!("resampler init: {e}")))?;
    let process_err = |e: rubato::ResampleError| AnalysisError::decode(format!("resampling: {e}"));

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut output: Vec<f32> = Vec::with_capacity(expected + delay + CHUNK_SIZE);

    let mut chunks = samples.chunks_exact(CHUNK_SIZE);
    for chunk in &mut chunks {
        let out = resampler.process(&[chunk], None).map_err(process_err)?;
        output.extend_from_slice(&out[0]);
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let out = resampler
            .process_partial(Some(&[rest]), None)
            .map_err(process_err)?;
        output.extend_from_slice(&out[0]);
    }

    // Flush the filter tail
    while output.len() < delay + expected {
        let flush: Option<&[Vec<f32>]> = None;
        let out = resampler.process_partial(flush, None).map_err(process_err)?;
        if out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&out[0]);
    }

    let mut resampled: Vec<f32> = output.into_iter().skip(delay).take(expected).collect();
    resampled.resize(expected, 0.0);
    Ok(resampled)
}
