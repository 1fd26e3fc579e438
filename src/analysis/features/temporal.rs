// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain audio frames:
// zero-crossing rate and short-time energy. Both are pure functions of the
// frame and accumulate in f64 so long frames do not drift.
//
// References:
// - Rabiner, L. & Schafer, R. (1978). Digital Processing of Speech Signals
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use crate::error::AnalysisError;

/// Minimum frame length for a zero-crossing rate
pub const MIN_ZCR_FRAME_LEN: usize = 2;

/// Minimum frame length for short-time energy
pub const MIN_ENERGY_FRAME_LEN: usize = 1;

/// Sign with zero mapped to zero (matches `numpy.sign`)
fn sign(x: f32) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Compute zero-crossing rate (ZCR)
///
/// Formula: ZCR = (1 / (2N)) × Σ|sign(x[n]) - sign(x[n-1])|
///
/// A sample of exactly zero has sign 0, so a crossing that lands on zero
/// contributes 1 per step instead of 2. The N-1 differences are divided by
/// 2N, so the result stays below 1.0.
///
/// # Errors
/// `InvalidFrameLength` when the frame has fewer than 2 samples.
pub fn compute_zero_crossing_rate(frame: &[f32]) -> Result<f32, AnalysisError> {
    if frame.len() < MIN_ZCR_FRAME_LEN {
        return Err(AnalysisError::InvalidFrameLength {
            len: frame.len(),
            required: MIN_ZCR_FRAME_LEN,
        });
    }

    let changes: f64 = frame
        .windows(2)
        .map(|pair| (sign(pair[1]) - sign(pair[0])).abs())
        .sum();

    Ok((changes / (2.0 * frame.len() as f64)) as f32)
}

/// Compute short-time energy (mean squared amplitude)
///
/// Formula: E = (1 / N) × Σ x[n]²
///
/// # Errors
/// `InvalidFrameLength` when the frame is empty.
pub fn compute_short_time_energy(frame: &[f32]) -> Result<f32, AnalysisError> {
    if frame.len() < MIN_ENERGY_FRAME_LEN {
        return Err(AnalysisError::InvalidFrameLength {
            len: frame.len(),
            required: MIN_ENERGY_FRAME_LEN,
        });
    }

    let sum_sq: f64 = frame
        .iter()
        .map(|&x| {
            let x = x as f64;
            x * x
        })
        .sum();

    Ok((sum_sq / frame.len() as f64) as f32)
}
