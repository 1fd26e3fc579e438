//! High-level entry points: decode a file and analyze it in one call

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{self, AnalysisResult, LabelCounts};
use crate::audio::{AudioDecoder, WavDecoder, Waveform};
use crate::config::AppConfig;
use crate::error::log_analysis_error;

/// Everything a caller needs to report on or render one analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: PathBuf,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub duration_secs: f64,
    pub frame_count: usize,
    pub label_counts: LabelCounts,
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn new(source: impl Into<PathBuf>, waveform: &Waveform, result: AnalysisResult) -> Self {
        Self {
            source: source.into(),
            sample_rate: waveform.sample_rate(),
            sample_count: waveform.len(),
            duration_secs: waveform.duration_secs(),
            frame_count: result.len(),
            label_counts: result.label_counts(),
            result,
        }
    }
}

/// Decode `path` with the WAV decoder and analyze it
///
/// Returns the decoded waveform alongside the report so a renderer can
/// plot the signal without decoding it again.
pub fn analyze_file(path: &Path, config: &AppConfig) -> Result<(Waveform, AnalysisReport)> {
    analyze_file_with(&WavDecoder::new(config.decode.clone()), path, config)
}

/// Decode `path` with a caller-supplied decoder and analyze it
pub fn analyze_file_with<D: AudioDecoder>(
    decoder: &D,
    path: &Path,
    config: &AppConfig,
) -> Result<(Waveform, AnalysisReport)> {
    config.validate().context("validating configuration")?;

    let waveform = decoder.decode(path).map_err(|err| {
        log_analysis_error(&err, "decode");
        err
    })?;
    tracing::info!(
        "[Api] Decoded {}: {} samples @ {} Hz",
        path.display(),
        waveform.len(),
        waveform.sample_rate()
    );

    let result = analysis::analyze(&waveform, &config.analysis)
        .map_err(|err| {
            log_analysis_error(&err, "analyze");
            err
        })
        .with_context(|| format!("analyzing {}", path.display()))?;

    let report = AnalysisReport::new(path, &waveform, result);
    Ok((waveform, report))
}
