use std::sync::Mutex;

use super::*;
use crate::audio::{SyntheticPattern, SyntheticSignal};
use crate::error::AnalysisError;

/// 20 ms at 22.05 kHz
const FRAME_SIZE: usize = 441;
const HOP: usize = 512;

fn waveform(samples: Vec<f32>) -> Waveform {
    Waveform::new(samples, 22_050).unwrap()
}

fn speechlike(len: usize) -> Waveform {
    // Silence, then a low tone, then quiet noise-like flicker
    let samples = (0..len)
        .map(|i| match (i * 3) / len {
            0 => 0.0,
            1 => (2.0 * std::f32::consts::PI * 150.0 * i as f32 / 22_050.0).sin() * 0.6,
            _ => {
                if i % 2 == 0 {
                    0.1
                } else {
                    -0.1
                }
            }
        })
        .collect();
    waveform(samples)
}

#[test]
fn test_empty_when_waveform_is_exactly_one_frame() {
    let result = analyze(&waveform(vec![0.3; FRAME_SIZE]), &AnalysisConfig::default()).unwrap();
    assert!(result.is_empty());
    assert!(result.zcr_values().is_empty());
    assert!(result.energy_values().is_empty());
}

#[test]
fn test_empty_when_waveform_is_shorter_than_frame() {
    let result = analyze(&waveform(vec![0.3; 10]), &AnalysisConfig::default()).unwrap();
    assert_eq!(result.len(), 0);

    let result = analyze(&waveform(Vec::new()), &AnalysisConfig::default()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_frame_plus_hop_gives_one_frame() {
    let result = analyze(
        &waveform(vec![0.0; FRAME_SIZE + HOP]),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.frame_offset(0), 0);
    assert_eq!(result.labels(), &[Label::Unvoiced]);
}

#[test]
fn test_sequences_are_index_aligned() {
    let wave = speechlike(22_050);
    let config = AnalysisConfig::default();
    let result = analyze(&wave, &config).unwrap();

    assert_eq!(result.labels().len(), result.zcr_values().len());
    assert_eq!(result.labels().len(), result.energy_values().len());
    assert_eq!(result.frame_size(), FRAME_SIZE);

    for record in result.frames() {
        let frame = &wave.samples()[record.offset..record.offset + FRAME_SIZE];
        let features = features::extract(frame).unwrap();
        assert_eq!(record.features, features, "frame {}", record.index);
        assert_eq!(
            record.label,
            classifier::classify_frame(frame, &config.thresholds).unwrap()
        );
    }
}

#[test]
fn test_frame_count_matches_boundary_rule() {
    // offsets < 22050 - 441 = 21609 with hop 512 -> ceil(21609 / 512) = 43
    let result = analyze(&speechlike(22_050), &AnalysisConfig::default()).unwrap();
    assert_eq!(result.len(), 43);
    assert_eq!(result.frame_offset(42), 42 * 512);
}

#[test]
fn test_silent_waveform_is_all_unvoiced() {
    let silence = SyntheticSignal::new(SyntheticPattern::Silence, 16_000, 500)
        .render()
        .unwrap();
    let result = analyze(&silence, &AnalysisConfig::default()).unwrap();
    assert!(!result.is_empty());
    assert!(result.labels().iter().all(|&l| l == Label::Unvoiced));
    assert!(result.energy_values().iter().all(|&e| e == 0.0));
}

#[test]
fn test_labels_follow_signal_regions() {
    let mut config = AnalysisConfig::default();
    config.thresholds.threshold_voiced = 0.3;
    let result = analyze(&speechlike(22_050 * 3), &config).unwrap();
    let labels = result.labels();

    assert_eq!(labels.first(), Some(&Label::Unvoiced));
    assert!(labels.contains(&Label::Voiced));
    // ±0.1 alternating: energy 0.01, ZCR ≈ 1.0
    assert_eq!(labels.last(), Some(&Label::Silence));
}

#[test]
fn test_loud_noisy_frames_are_unclassified() {
    let mut config = AnalysisConfig::default();
    config.thresholds.threshold_voiced = 0.5;
    let wave = SyntheticSignal::new(SyntheticPattern::Alternating, 22_050, 200)
        .with_amplitude(1.0)
        .render()
        .unwrap();
    let result = analyze(&wave, &config).unwrap();
    assert!(!result.is_empty());
    assert!(result.labels().iter().all(|&l| l == Label::Unclassified));
}

#[test]
fn test_analysis_is_deterministic() {
    let wave = SyntheticSignal::new(SyntheticPattern::WhiteNoise, 22_050, 1_000)
        .render()
        .unwrap();
    let config = AnalysisConfig::default();
    let first = analyze(&wave, &config).unwrap();
    let second = analyze(&wave, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let wave = speechlike(22_050 * 2);
    let sequential = analyze(&wave, &AnalysisConfig::default()).unwrap();

    for workers in [2, 3, 8, AnalysisConfig::MAX_WORKERS] {
        let config = AnalysisConfig {
            workers,
            ..AnalysisConfig::default()
        };
        let parallel = analyze(&wave, &config).unwrap();
        assert_eq!(parallel, sequential, "workers={}", workers);
    }
}

#[test]
fn test_cancelled_token_aborts_without_result() {
    let wave = speechlike(22_050);
    let token = CancellationToken::new();
    token.cancel();

    let err = analyze_with_cancel(&wave, &AnalysisConfig::default(), Some(&token)).unwrap_err();
    assert_eq!(err, AnalysisError::Cancelled);

    let config = AnalysisConfig {
        workers: 4,
        ..AnalysisConfig::default()
    };
    let err = analyze_with_cancel(&wave, &config, Some(&token)).unwrap_err();
    assert_eq!(err, AnalysisError::Cancelled);
}

#[test]
fn test_cancel_between_frames_stops_the_run() {
    let wave = speechlike(22_050);
    let token = CancellationToken::new();
    let seen = Mutex::new(Vec::new());

    let err = analyze_with_progress(&wave, &AnalysisConfig::default(), Some(&token), &|index| {
        seen.lock().unwrap().push(index);
        if index == 2 {
            token.cancel();
        }
    })
    .unwrap_err();

    assert_eq!(err, AnalysisError::Cancelled);
    // Frame 3 was never measured
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_cancel_between_frames_stops_parallel_run() {
    let wave = speechlike(22_050 * 4);
    let token = CancellationToken::new();
    let config = AnalysisConfig {
        workers: 2,
        ..AnalysisConfig::default()
    };

    let err = analyze_with_progress(&wave, &config, Some(&token), &|index| {
        if index == 0 {
            token.cancel();
        }
    })
    .unwrap_err();
    assert_eq!(err, AnalysisError::Cancelled);
}

#[test]
fn test_progress_reports_every_frame() {
    let wave = speechlike(22_050 * 2);
    for workers in [1, 3] {
        let config = AnalysisConfig {
            workers,
            ..AnalysisConfig::default()
        };
        let seen = Mutex::new(Vec::new());
        let result =
            analyze_with_progress(&wave, &config, None, &|index| seen.lock().unwrap().push(index))
                .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..result.len()).collect::<Vec<_>>(), "workers={}", workers);
    }
}

#[test]
fn test_worker_count_is_clamped() {
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    assert_eq!(worker_count(1, 100), 1);
    assert_eq!(worker_count(AnalysisConfig::MAX_WORKERS, 3), cores.min(3));
    assert!(worker_count(AnalysisConfig::MAX_WORKERS, 10_000) <= cores);
    assert_eq!(worker_count(8, 0), 1);
}

#[test]
fn test_excessive_worker_count_is_rejected() {
    let config = AnalysisConfig {
        workers: 200_000,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        analyze(&speechlike(22_050), &config),
        Err(AnalysisError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_unset_token_does_not_interfere() {
    let wave = speechlike(22_050);
    let token = CancellationToken::new();
    let with_token = analyze_with_cancel(&wave, &AnalysisConfig::default(), Some(&token)).unwrap();
    assert_eq!(with_token, analyze(&wave, &AnalysisConfig::default()).unwrap());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    // 20 ms at 50 Hz -> 1 sample frame
    let tiny = Waveform::new(vec![0.0; 100], 50).unwrap();
    assert!(matches!(
        analyze(&tiny, &AnalysisConfig::default()),
        Err(AnalysisError::InvalidConfiguration { .. })
    ));

    let config = AnalysisConfig {
        hop_size_samples: 0,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        analyze(&speechlike(5_000), &config),
        Err(AnalysisError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_label_counts_sum_to_frame_count() {
    let mut config = AnalysisConfig::default();
    config.thresholds.threshold_voiced = 0.3;
    let result = analyze(&speechlike(22_050 * 3), &config).unwrap();
    let counts = result.label_counts();
    assert_eq!(
        counts.unvoiced + counts.voiced + counts.silence + counts.unclassified,
        result.len()
    );
    assert!(counts.unvoiced > 0 && counts.voiced > 0 && counts.silence > 0);
}

#[test]
fn test_frame_start_times() {
    let result = analyze(&speechlike(22_050), &AnalysisConfig::default()).unwrap();
    assert_eq!(result.frame_start_secs(0), 0.0);
    assert!((result.frame_start_secs(2) - 1024.0 / 22_050.0).abs() < 1e-12);
}
