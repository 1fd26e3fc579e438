// Types module - Data structures for frame features

/// Features extracted from one analysis frame
///
/// Both values are non-negative. They are transient: the segmentation
/// driver copies them into the `AnalysisResult` and drops the struct.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FeatureVector {
    /// Zero-crossing rate (fraction of adjacent-sample sign changes)
    ///
    /// Higher values indicate noise-like or high-frequency content.
    pub zcr: f32,

    /// Short-time energy (mean squared amplitude)
    pub energy: f32,
}
