//! Rendering collaborator
//!
//! Turns a waveform and its `AnalysisResult` into chart descriptions and
//! hands them to a [`ChartRenderer`]. The analysis core never touches this
//! module; it only produces plain data.
//!
//! Four charts are built, in order:
//! 1. Time-Domain Signal (amplitude over seconds)
//! 2. Zero Crossing Rate Over Time (per frame index)
//! 3. Short Time Energy Over Time (per frame index)
//! 4. Speech Classification Over Time (categorical label per frame index)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::classifier::Label;
use crate::analysis::AnalysisResult;
use crate::audio::Waveform;

/// How a series should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    Line,
    LineWithMarkers,
}

/// One chart: a titled, labelled (x, y) series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub style: ChartStyle,
    pub points: Vec<[f64; 2]>,
    /// Tick names for categorical y values (index = y value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_categories: Option<Vec<String>>,
}

/// Chart construction options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Upper bound on plotted waveform points; longer signals are reduced
    /// to per-bucket min/max pairs
    pub max_waveform_points: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            max_waveform_points: 4_000,
        }
    }
}

/// Sink for chart descriptions
pub trait ChartRenderer {
    fn render(&mut self, charts: &[ChartSpec]) -> Result<()>;
}

/// Writes charts as a single JSON document `{ "charts": [...] }`
pub struct JsonChartRenderer<W: Write> {
    writer: W,
}

impl<W: Write> JsonChartRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonChartRenderer<BufWriter<File>> {
    /// Create a renderer writing to `path`
    pub fn to_file(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

#[derive(Serialize)]
struct ChartDocument<'a> {
    charts: &'a [ChartSpec],
}

impl<W: Write> ChartRenderer for JsonChartRenderer<W> {
    fn render(&mut self, charts: &[ChartSpec]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &ChartDocument { charts })
            .context("serializing charts")?;
        self.writer.flush().context("flushing chart output")?;
        Ok(())
    }
}

/// Y value of a label on the classification chart
pub fn label_level(label: Label) -> usize {
    Label::ALL
        .iter()
        .position(|&l| l == label)
        .unwrap_or(Label::ALL.len())
}

/// Build the four standard charts
pub fn build_charts(
    waveform: &Waveform,
    result: &AnalysisResult,
    options: &ChartOptions,
) -> Vec<ChartSpec> {
    vec![
        waveform_chart(waveform, options.max_waveform_points),
        series_chart(
            "Zero Crossing Rate Over Time",
            "Zero Crossing Rate",
            "b",
            result.zcr_values(),
        ),
        series_chart(
            "Short Time Energy Over Time",
            "Short Time Energy",
            "r",
            result.energy_values(),
        ),
        classification_chart(result.labels()),
    ]
}

fn waveform_chart(waveform: &Waveform, max_points: usize) -> ChartSpec {
    let samples = waveform.samples();
    let max_points = max_points.max(2);

    let points = if samples.len() <= max_points {
        samples
            .iter()
            .enumerate()
            .map(|(i, &s)| [waveform.time_of(i), s as f64])
            .collect()
    } else {
        // Two points (min, max) per bucket keeps peaks visible
        let bucket = samples.len().div_ceil(max_points / 2);
        let mut points = Vec::with_capacity(max_points);
        for (b, chunk) in samples.chunks(bucket).enumerate() {
            let start = b * bucket;
            let (min_idx, max_idx) = extrema(chunk);
            let (first, second) = if min_idx <= max_idx {
                (min_idx, max_idx)
            } else {
                (max_idx, min_idx)
            };
            points.push([waveform.time_of(start + first), chunk[first] as f64]);
            points.push([waveform.time_of(start + second), chunk[second] as f64]);
        }
        points
    };

    ChartSpec {
        title: "Time-Domain Signal".to_string(),
        x_label: "Time (s)".to_string(),
        y_label: "Amplitude".to_string(),
        color: "k".to_string(),
        style: ChartStyle::Line,
        points,
        y_categories: None,
    }
}

fn extrema(chunk: &[f32]) -> (usize, usize) {
    let mut min_idx = 0;
    let mut max_idx = 0;
    for (i, &s) in chunk.iter().enumerate() {
        if s < chunk[min_idx] {
            min_idx = i;
        }
        if s > chunk[max_idx] {
            max_idx = i;
        }
    }
    (min_idx, max_idx)
}

fn series_chart(title: &str, y_label: &str, color: &str, values: &[f32]) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        x_label: "Frame Index".to_string(),
        y_label: y_label.to_string(),
        color: color.to_string(),
        style: ChartStyle::Line,
        points: values
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v as f64])
            .collect(),
        y_categories: None,
    }
}

fn classification_chart(labels: &[Label]) -> ChartSpec {
    ChartSpec {
        title: "Speech Classification Over Time".to_string(),
        x_label: "Frame Index".to_string(),
        y_label: "Classification".to_string(),
        color: "g".to_string(),
        style: ChartStyle::LineWithMarkers,
        points: labels
            .iter()
            .enumerate()
            .map(|(i, &label)| [i as f64, label_level(label) as f64])
            .collect(),
        y_categories: Some(Label::ALL.iter().map(|l| l.as_str().to_string()).collect()),
    }
}
