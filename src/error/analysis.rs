// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use thiserror::Error;

/// Analysis error code constants
///
/// Error code range: 3001-3004
pub struct AnalysisErrorCodes;

impl AnalysisErrorCodes {
    /// Frame too short for the requested feature
    pub const INVALID_FRAME_LENGTH: i32 = 3001;

    /// Segmentation or threshold configuration is unusable
    pub const INVALID_CONFIGURATION: i32 = 3002;

    /// Audio source could not be decoded
    pub const DECODE_FAILURE: i32 = 3003;

    /// Analysis was cancelled between frames
    pub const CANCELLED: i32 = 3004;
}

/// Errors raised while decoding, segmenting or classifying a waveform
///
/// Every variant aborts the whole analysis call; no partial result is
/// ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Frame has fewer samples than the feature computation needs
    #[error("frame of {len} samples is too short (need at least {required})")]
    InvalidFrameLength { len: usize, required: usize },

    /// Derived frame size, hop size, sample rate or thresholds are invalid
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Decoder could not produce samples; reason is surfaced unchanged
    #[error("decode failure: {reason}")]
    DecodeFailure { reason: String },

    /// Cancellation token was set before the analysis finished
    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        AnalysisError::DecodeFailure {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::InvalidFrameLength { .. } => AnalysisErrorCodes::INVALID_FRAME_LENGTH,
            AnalysisError::InvalidConfiguration { .. } => {
                AnalysisErrorCodes::INVALID_CONFIGURATION
            }
            AnalysisError::DecodeFailure { .. } => AnalysisErrorCodes::DECODE_FAILURE,
            AnalysisError::Cancelled => AnalysisErrorCodes::CANCELLED,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Log an analysis error with structured context
///
/// Emits the numeric code, the component and the human-readable message
/// on a single line so failures can be grepped out of CLI logs.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=FrameAnalyzer, message={}",
        context,
        err.code(),
        err.message()
    );
}
