// Feature extraction for frame-level voicing classification
//
// Module organization:
// - types: Data structures (FeatureVector)
// - temporal: Time-domain features (ZCR, short-time energy)
// - mod.rs: Coordinator (extract)

mod temporal;
mod types;

pub use temporal::{
    compute_short_time_energy, compute_zero_crossing_rate, MIN_ENERGY_FRAME_LEN,
    MIN_ZCR_FRAME_LEN,
};
pub use types::FeatureVector;

use crate::error::AnalysisError;

/// Extract both features from one frame
///
/// # Errors
/// `InvalidFrameLength` if the frame is shorter than 2 samples.
pub fn extract(frame: &[f32]) -> Result<FeatureVector, AnalysisError> {
    let zcr = compute_zero_crossing_rate(frame)?;
    let energy = compute_short_time_energy(frame)?;
    Ok(FeatureVector { zcr, energy })
}
