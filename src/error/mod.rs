// Error types for the voicing analyzer
//
// This module defines the typed error returned by every analysis, decoding
// and configuration operation, together with the numeric error codes used
// in CLI reports and structured log lines.

mod analysis;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so reports and logs stay machine-readable.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
