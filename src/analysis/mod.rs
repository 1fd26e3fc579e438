// Analysis module - frame segmentation, feature extraction, classification
//
// Pipeline: FrameOffsets -> features::extract -> classifier::classify_features
// -> AnalysisResult. Every frame depends only on its own samples, so the
// loop can be split across worker threads; results are gathered back in
// ascending offset order either way.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde::Serialize;

use crate::audio::Waveform;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

pub mod classifier;
pub mod features;
pub mod segmentation;

use classifier::{classify_features, ClassifierThresholds, Label};
use features::FeatureVector;
use segmentation::segment;

/// Index-aligned per-frame output of one analysis
///
/// `labels[i]`, `zcr_values[i]` and `energy_values[i]` all describe the
/// frame starting at `i * hop_size`. The three sequences always have the
/// same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    labels: Vec<Label>,
    zcr_values: Vec<f32>,
    energy_values: Vec<f32>,
}

impl AnalysisResult {
    fn with_capacity(sample_rate: u32, frame_size: usize, hop_size: usize, frames: usize) -> Self {
        Self {
            sample_rate,
            frame_size,
            hop_size,
            labels: Vec::with_capacity(frames),
            zcr_values: Vec::with_capacity(frames),
            energy_values: Vec::with_capacity(frames),
        }
    }

    fn push(&mut self, features: FeatureVector, label: Label) {
        self.labels.push(label);
        self.zcr_values.push(features.zcr);
        self.energy_values.push(features.energy);
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn zcr_values(&self) -> &[f32] {
        &self.zcr_values
    }

    pub fn energy_values(&self) -> &[f32] {
        &self.energy_values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Start offset in samples of frame `index`
    pub fn frame_offset(&self, index: usize) -> usize {
        index * self.hop_size
    }

    /// Start time in seconds of frame `index`
    pub fn frame_start_secs(&self, index: usize) -> f64 {
        self.frame_offset(index) as f64 / self.sample_rate as f64
    }

    /// Iterate frames with their offset, features and label
    pub fn frames(&self) -> impl Iterator<Item = FrameRecord> + '_ {
        (0..self.len()).map(move |index| FrameRecord {
            index,
            offset: self.frame_offset(index),
            features: FeatureVector {
                zcr: self.zcr_values[index],
                energy: self.energy_values[index],
            },
            label: self.labels[index],
        })
    }

    /// Number of frames carrying each label
    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for label in &self.labels {
            match label {
                Label::Unvoiced => counts.unvoiced += 1,
                Label::Voiced => counts.voiced += 1,
                Label::Silence => counts.silence += 1,
                Label::Unclassified => counts.unclassified += 1,
            }
        }
        counts
    }
}

/// One frame of an `AnalysisResult`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    pub index: usize,
    pub offset: usize,
    pub features: FeatureVector,
    pub label: Label,
}

/// Frame totals per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub unvoiced: usize,
    pub voiced: usize,
    pub silence: usize,
    pub unclassified: usize,
}

/// Cooperative cancellation flag checked between frames
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Segment, extract and classify every frame of `waveform`
///
/// # Errors
/// - `InvalidConfiguration` if the derived frame size is below 2 samples,
///   the hop size or worker count is zero, or a threshold is not finite.
/// - `InvalidFrameLength` if a frame cannot be measured (aborts the run).
///
/// A waveform no longer than one frame produces an empty result.
pub fn analyze(waveform: &Waveform, config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    analyze_with_cancel(waveform, config, None)
}

/// [`analyze`] with an optional cancellation token
///
/// When the token is set, the run stops before the next frame and returns
/// `AnalysisError::Cancelled`.
pub fn analyze_with_cancel(
    waveform: &Waveform,
    config: &AnalysisConfig,
    cancel: Option<&CancellationToken>,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_with_progress(waveform, config, cancel, &|_: usize| {})
}

/// [`analyze_with_cancel`] that also reports each classified frame
///
/// `on_frame` receives the index of every frame as soon as it has been
/// classified. With several workers the calls arrive from worker threads
/// and are not ordered by index.
pub fn analyze_with_progress(
    waveform: &Waveform,
    config: &AnalysisConfig,
    cancel: Option<&CancellationToken>,
    on_frame: &(dyn Fn(usize) + Sync),
) -> Result<AnalysisResult, AnalysisError> {
    let frame_size = config.validate_for(waveform.sample_rate())?;
    let offsets = segment(waveform.len(), frame_size, config.hop_size_samples)?;
    let frame_count = offsets.len();

    tracing::debug!(
        "[FrameAnalyzer] {} samples @ {} Hz: frame_size={}, hop={}, frames={}, workers={}",
        waveform.len(),
        waveform.sample_rate(),
        frame_size,
        config.hop_size_samples,
        frame_count,
        config.workers
    );

    let mut result = AnalysisResult::with_capacity(
        waveform.sample_rate(),
        frame_size,
        config.hop_size_samples,
        frame_count,
    );

    let workers = worker_count(config.workers, frame_count);
    let frames = FrameJob {
        samples: waveform.samples(),
        frame_size,
        thresholds: &config.thresholds,
        cancel,
        on_frame,
    };
    let measured = if workers == 1 {
        frames.measure(offsets.enumerate())?
    } else {
        frames.measure_parallel(offsets.collect(), workers)?
    };

    for (features, label) in measured {
        result.push(features, label);
    }

    tracing::info!(
        "[FrameAnalyzer] Classified {} frames: {:?}",
        result.len(),
        result.label_counts()
    );

    Ok(result)
}

/// Threads actually spawned for `requested` workers over `frame_count` frames
///
/// Never more than the frames to measure or the cores available.
fn worker_count(requested: usize, frame_count: usize) -> usize {
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let workers = requested.min(cores).min(frame_count).max(1);
    if workers < requested {
        tracing::debug!(
            "[FrameAnalyzer] Clamped workers {} -> {} ({} cores, {} frames)",
            requested,
            workers,
            cores,
            frame_count
        );
    }
    workers
}

/// Shared inputs of the per-frame loop
#[derive(Clone, Copy)]
struct FrameJob<'a> {
    samples: &'a [f32],
    frame_size: usize,
    thresholds: &'a ClassifierThresholds,
    cancel: Option<&'a CancellationToken>,
    on_frame: &'a (dyn Fn(usize) + Sync),
}

impl FrameJob<'_> {
    /// Measure and classify `(index, offset)` frames, in order
    fn measure(
        &self,
        frames: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Vec<(FeatureVector, Label)>, AnalysisError> {
        let frames = frames.into_iter();
        let mut measured = Vec::with_capacity(frames.size_hint().0);
        for (index, offset) in frames {
            if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(AnalysisError::Cancelled);
            }
            let frame = &self.samples[offset..offset + self.frame_size];
            let features = features::extract(frame)?;
            measured.push((features, classify_features(&features, self.thresholds)));
            (self.on_frame)(index);
        }
        Ok(measured)
    }

    /// Scatter contiguous offset ranges over scoped threads, gather in order
    ///
    /// The first error in offset order wins, matching the sequential path.
    fn measure_parallel(
        &self,
        offsets: Vec<usize>,
        workers: usize,
    ) -> Result<Vec<(FeatureVector, Label)>, AnalysisError> {
        let chunk_len = offsets.len().div_ceil(workers);

        let chunks: Vec<Result<Vec<(FeatureVector, Label)>, AnalysisError>> =
            thread::scope(|scope| {
                let handles: Vec<_> = offsets
                    .chunks(chunk_len)
                    .enumerate()
                    .map(|(chunk_index, chunk)| {
                        let first = chunk_index * chunk_len;
                        let job = *self;
                        scope.spawn(move || {
                            job.measure(chunk.iter().enumerate().map(|(i, &o)| (first + i, o)))
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                    })
                    .collect()
            });

        let mut measured = Vec::with_capacity(offsets.len());
        for chunk in chunks {
            measured.extend(chunk?);
        }
        Ok(measured)
    }
}

#[cfg(test)]
mod tests;
