// Classifier - static-threshold voicing classification
//
// This module implements the decision chain that labels a frame as
// Unvoiced, Voiced or Silence from its short-time energy and zero-crossing
// rate. Thresholds come from an explicit `ClassifierThresholds` value; there
// are no module-level defaults beyond `Default`.
//
// Decision order is fixed and first match wins:
// 1. energy < threshold_unvoiced        -> Unvoiced
// 2. zcr < threshold_voiced             -> Voiced
// 3. energy < silence_energy_ceiling    -> Silence
// 4. otherwise                          -> Unclassified

use serde::{Deserialize, Serialize};

use crate::analysis::features::{self, FeatureVector};
use crate::error::AnalysisError;

/// Voicing label assigned to a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Energy below the unvoiced floor
    Unvoiced,
    /// Low zero-crossing rate
    Voiced,
    /// Energy below the silence ceiling after the first two checks failed
    Silence,
    /// No rule matched (loud and noisy frame)
    Unclassified,
}

impl Label {
    /// All labels in plotting order
    pub const ALL: [Label; 4] = [
        Label::Silence,
        Label::Voiced,
        Label::Unvoiced,
        Label::Unclassified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Unvoiced => "Unvoiced",
            Label::Voiced => "Voiced",
            Label::Silence => "Silence",
            Label::Unclassified => "Unclassified",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static classification thresholds
///
/// Recognized options:
/// - `threshold_unvoiced`: energy floor below which a frame is Unvoiced
/// - `threshold_voiced`: ZCR ceiling below which a frame is Voiced
/// - `silence_energy_ceiling`: energy ceiling below which a frame is Silence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub threshold_unvoiced: f32,
    pub threshold_voiced: f32,
    pub silence_energy_ceiling: f32,
}

impl ClassifierThresholds {
    pub const DEFAULT_THRESHOLD_UNVOICED: f32 = 0.001;
    pub const DEFAULT_THRESHOLD_VOICED: f32 = 1.0;
    pub const DEFAULT_SILENCE_ENERGY_CEILING: f32 = 0.05;

    /// Reject thresholds that would make every comparison meaningless
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let named = [
            ("threshold_unvoiced", self.threshold_unvoiced),
            ("threshold_voiced", self.threshold_voiced),
            ("silence_energy_ceiling", self.silence_energy_ceiling),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(AnalysisError::config(format!(
                    "{} must be finite (got {})",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(AnalysisError::config(format!(
                    "{} must be >= 0 (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            threshold_unvoiced: Self::DEFAULT_THRESHOLD_UNVOICED,
            threshold_voiced: Self::DEFAULT_THRESHOLD_VOICED,
            silence_energy_ceiling: Self::DEFAULT_SILENCE_ENERGY_CEILING,
        }
    }
}

/// Classify precomputed features
///
/// Comparisons are strict (`<`), so a value exactly on a threshold falls
/// through to the next rule.
pub fn classify_features(features: &FeatureVector, thresholds: &ClassifierThresholds) -> Label {
    if features.energy < thresholds.threshold_unvoiced {
        Label::Unvoiced
    } else if features.zcr < thresholds.threshold_voiced {
        Label::Voiced
    } else if features.energy < thresholds.silence_energy_ceiling {
        Label::Silence
    } else {
        Label::Unclassified
    }
}

/// Extract features from a frame and classify it
///
/// # Errors
/// `InvalidFrameLength` if the frame is shorter than 2 samples.
pub fn classify_frame(
    frame: &[f32],
    thresholds: &ClassifierThresholds,
) -> Result<Label, AnalysisError> {
    let features = features::extract(frame)?;
    Ok(classify_features(&features, thresholds))
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
