//! End-to-end tests for the decode -> analyze -> render path
//!
//! These tests write real WAV files to the temp directory, decode them
//! through the public API and check the index-aligned output sequences.

use std::path::PathBuf;

use voicing_analyzer::audio::{write_wav, SyntheticPattern, SyntheticSignal};
use voicing_analyzer::render::{build_charts, ChartOptions, ChartRenderer, JsonChartRenderer};
use voicing_analyzer::{
    analyze, analyze_file, AnalysisConfig, AnalysisError, AppConfig, Label, Waveform,
};

fn temp_path(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "voicing_integration_{}_{}.{}",
        name,
        std::process::id(),
        ext
    ))
}

/// Silence, then a 150 Hz tone, then quiet alternating flicker
fn three_region_waveform(sample_rate: u32, region_len: usize) -> Waveform {
    let mut samples = vec![0.0f32; region_len];
    samples.extend((0..region_len).map(|i| {
        (2.0 * std::f32::consts::PI * 150.0 * i as f32 / sample_rate as f32).sin() * 0.6
    }));
    samples.extend((0..region_len).map(|i| if i % 2 == 0 { 0.1 } else { -0.1 }));
    Waveform::new(samples, sample_rate).unwrap()
}

#[test]
fn test_analyze_file_matches_in_memory_analysis() {
    let path = temp_path("in_memory_match", "wav");
    let waveform = three_region_waveform(22_050, 22_050);
    write_wav(&path, &waveform).unwrap();

    let mut config = AppConfig::default();
    config.analysis.thresholds.threshold_voiced = 0.3;

    let (decoded, report) = analyze_file(&path, &config).unwrap();
    let direct = analyze(&waveform, &config.analysis).unwrap();

    assert_eq!(decoded, waveform);
    assert_eq!(report.result, direct);
    assert_eq!(report.frame_count, direct.len());

    let labels = report.result.labels();
    assert_eq!(labels.first(), Some(&Label::Unvoiced));
    assert!(labels.contains(&Label::Voiced));
    assert_eq!(labels.last(), Some(&Label::Silence));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_resampled_decode_uses_target_rate_for_framing() {
    let path = temp_path("resampled", "wav");
    let waveform = SyntheticSignal::new(SyntheticPattern::Sine, 44_100, 500)
        .render()
        .unwrap();
    write_wav(&path, &waveform).unwrap();

    let mut config = AppConfig::default();
    config.decode.target_sample_rate = Some(22_050);
    let (decoded, report) = analyze_file(&path, &config).unwrap();

    assert_eq!(decoded.sample_rate(), 22_050);
    assert_eq!(report.result.frame_size(), 441);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_tone_above_target_nyquist_does_not_alias_into_voiced_frames() {
    let path = temp_path("aliasing", "wav");
    let waveform = SyntheticSignal::new(SyntheticPattern::Sine, 44_100, 1_000)
        .with_frequency(15_000.0)
        .render()
        .unwrap();
    write_wav(&path, &waveform).unwrap();

    let mut config = AppConfig::default();
    config.decode.target_sample_rate = Some(22_050);
    let (_, report) = analyze_file(&path, &config).unwrap();

    let labels = report.result.labels();
    let energies = report.result.energy_values();
    assert!(labels.len() > 8);
    // Skip the filter start-up and tail frames
    for i in 2..labels.len() - 2 {
        assert_eq!(labels[i], Label::Unvoiced, "frame {}", i);
        assert!(energies[i] < 1e-3, "frame {} energy {}", i, energies[i]);
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_file_reports_decode_failure() {
    let err = analyze_file(
        &temp_path("does_not_exist", "wav"),
        &AppConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::DecodeFailure { .. })
    ));
}

#[test]
fn test_boundary_properties_through_public_api() {
    let config = AnalysisConfig::default();

    let exact = Waveform::new(vec![0.2; 441], 22_050).unwrap();
    assert!(analyze(&exact, &config).unwrap().is_empty());

    let one = Waveform::new(vec![0.2; 441 + 512], 22_050).unwrap();
    let result = analyze(&one, &config).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.frame_offset(0), 0);
}

#[test]
fn test_charts_written_to_disk() {
    let waveform = three_region_waveform(16_000, 8_000);
    let result = analyze(&waveform, &AnalysisConfig::default()).unwrap();
    let charts = build_charts(&waveform, &result, &ChartOptions::default());

    let path = temp_path("charts", "json");
    JsonChartRenderer::to_file(&path)
        .unwrap()
        .render(&charts)
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let written = json["charts"].as_array().unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(
        written[3]["points"].as_array().unwrap().len(),
        result.len()
    );

    let _ = std::fs::remove_file(&path);
}
