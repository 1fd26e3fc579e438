// Voicing Analyzer Core
// Frame-based voiced/unvoiced/silence classification from ZCR and energy

// Module declarations
pub mod analysis;
pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod render;

// Re-exports for convenience
pub use analysis::classifier::{classify_frame, ClassifierThresholds, Label};
pub use analysis::features::{compute_short_time_energy, compute_zero_crossing_rate};
pub use analysis::{
    analyze, analyze_with_cancel, analyze_with_progress, AnalysisResult, CancellationToken,
};
pub use api::{analyze_file, AnalysisReport};
pub use audio::Waveform;
pub use config::{AnalysisConfig, AppConfig};
pub use error::{AnalysisError, ErrorCode};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Records from the `log` facade
/// are picked up through tracing-subscriber's log bridge. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
