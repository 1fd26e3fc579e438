// Segmentation - frame size derivation and frame offset sequence
//
// Frames start at 0, hop, 2*hop, ... and continue while
// `offset < total_samples - frame_size`. A frame that would end exactly on
// the last sample is therefore not produced, and a waveform no longer than
// one frame yields no frames at all.

use crate::analysis::features::MIN_ZCR_FRAME_LEN;
use crate::error::AnalysisError;

/// Derive the frame length in samples from a window duration
///
/// `frame_size = round(window_size_ms / 1000 * sample_rate)`
///
/// # Errors
/// `InvalidConfiguration` for a zero sample rate, a non-finite or
/// non-positive window, or a frame shorter than the ZCR minimum.
pub fn frame_size_for(window_size_ms: f32, sample_rate: u32) -> Result<usize, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::config("sample rate must be > 0"));
    }
    if !window_size_ms.is_finite() || window_size_ms <= 0.0 {
        return Err(AnalysisError::config(format!(
            "window size must be a positive number of milliseconds (got {})",
            window_size_ms
        )));
    }

    let frame_size = ((window_size_ms as f64 / 1000.0) * sample_rate as f64).round() as usize;
    if frame_size < MIN_ZCR_FRAME_LEN {
        return Err(AnalysisError::config(format!(
            "{} ms at {} Hz gives a frame of {} samples (need at least {})",
            window_size_ms, sample_rate, frame_size, MIN_ZCR_FRAME_LEN
        )));
    }

    Ok(frame_size)
}

/// Lazy, finite sequence of frame start offsets
///
/// Cloning forks the iterator at its current position. Call [`segment`]
/// again to start over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOffsets {
    next: usize,
    /// Exclusive upper bound on offsets (`total_samples - frame_size`)
    limit: usize,
    hop_size: usize,
}

/// Build the offset sequence for a waveform of `total_samples`
///
/// # Errors
/// `InvalidConfiguration` if `hop_size` is zero or `frame_size` is below
/// the ZCR minimum.
pub fn segment(
    total_samples: usize,
    frame_size: usize,
    hop_size: usize,
) -> Result<FrameOffsets, AnalysisError> {
    if hop_size == 0 {
        return Err(AnalysisError::config("hop size must be > 0"));
    }
    if frame_size < MIN_ZCR_FRAME_LEN {
        return Err(AnalysisError::config(format!(
            "frame size must be at least {} samples (got {})",
            MIN_ZCR_FRAME_LEN, frame_size
        )));
    }

    Ok(FrameOffsets {
        next: 0,
        limit: total_samples.saturating_sub(frame_size),
        hop_size,
    })
}

impl Iterator for FrameOffsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.limit {
            return None;
        }
        let offset = self.next;
        self.next = self.next.saturating_add(self.hop_size);
        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.limit {
            0
        } else {
            (self.limit - self.next).div_ceil(self.hop_size)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameOffsets {}
