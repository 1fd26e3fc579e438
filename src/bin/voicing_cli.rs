use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use voicing_analyzer::api::{analyze_file, AnalysisReport};
use voicing_analyzer::audio::{write_wav, SyntheticPattern, SyntheticSignal};
use voicing_analyzer::render::{build_charts, ChartOptions, ChartRenderer, JsonChartRenderer};
use voicing_analyzer::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "voicing_cli",
    about = "Frame-level voiced/unvoiced/silence classification for WAV files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every frame of a WAV file and print a JSON report
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// JSON configuration file (missing fields use defaults)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        window_ms: Option<f32>,
        #[arg(long)]
        hop: Option<usize>,
        #[arg(long)]
        threshold_unvoiced: Option<f32>,
        #[arg(long)]
        threshold_voiced: Option<f32>,
        #[arg(long)]
        silence_ceiling: Option<f32>,
        #[arg(long)]
        workers: Option<usize>,
        /// Resample to this rate before analysis
        #[arg(long)]
        resample_hz: Option<u32>,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write chart data (JSON) for the four standard plots
        #[arg(long)]
        charts: Option<PathBuf>,
    },
    /// Write a synthetic test signal as a mono float WAV file
    Synth {
        #[arg(long, value_enum)]
        pattern: PatternArg,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 22_050)]
        sample_rate: u32,
        #[arg(long, default_value_t = 1_000)]
        duration_ms: u32,
        #[arg(long, default_value_t = 220.0)]
        frequency_hz: f32,
        #[arg(long, default_value_t = 0.8)]
        amplitude: f32,
    },
    /// Print the default configuration as JSON
    DumpConfig,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PatternArg {
    Sine,
    Square,
    WhiteNoise,
    Alternating,
    Silence,
}

impl From<PatternArg> for SyntheticPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Sine => SyntheticPattern::Sine,
            PatternArg::Square => SyntheticPattern::Square,
            PatternArg::WhiteNoise => SyntheticPattern::WhiteNoise,
            PatternArg::Alternating => SyntheticPattern::Alternating,
            PatternArg::Silence => SyntheticPattern::Silence,
        }
    }
}

/// Command-line overrides applied on top of the loaded configuration
#[derive(Debug, Default)]
struct Overrides {
    window_ms: Option<f32>,
    hop: Option<usize>,
    threshold_unvoiced: Option<f32>,
    threshold_voiced: Option<f32>,
    silence_ceiling: Option<f32>,
    workers: Option<usize>,
    resample_hz: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        let analysis = &mut config.analysis;
        if let Some(v) = self.window_ms {
            analysis.window_size_ms = v;
        }
        if let Some(v) = self.hop {
            analysis.hop_size_samples = v;
        }
        if let Some(v) = self.threshold_unvoiced {
            analysis.thresholds.threshold_unvoiced = v;
        }
        if let Some(v) = self.threshold_voiced {
            analysis.thresholds.threshold_voiced = v;
        }
        if let Some(v) = self.silence_ceiling {
            analysis.thresholds.silence_energy_ceiling = v;
        }
        if let Some(v) = self.workers {
            analysis.workers = v;
        }
        if self.resample_hz.is_some() {
            config.decode.target_sample_rate = self.resample_hz;
        }
    }
}

fn main() -> ExitCode {
    voicing_analyzer::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            window_ms,
            hop,
            threshold_unvoiced,
            threshold_voiced,
            silence_ceiling,
            workers,
            resample_hz,
            output,
            charts,
        } => {
            let overrides = Overrides {
                window_ms,
                hop,
                threshold_unvoiced,
                threshold_voiced,
                silence_ceiling,
                workers,
                resample_hz,
            };
            run_analyze(&input, config, overrides, output, charts)
        }
        Commands::Synth {
            pattern,
            output,
            sample_rate,
            duration_ms,
            frequency_hz,
            amplitude,
        } => {
            let signal = SyntheticSignal::new(pattern.into(), sample_rate, duration_ms)
                .with_frequency(frequency_hz)
                .with_amplitude(amplitude);
            run_synth(&signal, &output)
        }
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&AppConfig::default())?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_analyze(
    input: &Path,
    config_path: Option<PathBuf>,
    overrides: Overrides,
    output_path: Option<PathBuf>,
    charts_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut config = match config_path {
        Some(path) => AppConfig::from_json_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    overrides.apply(&mut config);

    let (waveform, report) = analyze_file(input, &config)?;

    if let Some(path) = charts_path {
        let charts = build_charts(&waveform, &report.result, &ChartOptions::default());
        JsonChartRenderer::to_file(&path)?
            .render(&charts)
            .with_context(|| format!("writing charts to {}", path.display()))?;
    }

    emit_report(&report, output_path)?;
    Ok(ExitCode::from(0))
}

fn run_synth(signal: &SyntheticSignal, output: &Path) -> Result<ExitCode> {
    let waveform = signal.render().context("rendering synthetic signal")?;
    write_wav(output, &waveform).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Wrote {} samples @ {} Hz to {}",
        waveform.len(),
        waveform.sample_rate(),
        output.display()
    );
    Ok(ExitCode::from(0))
}

fn emit_report(report: &AnalysisReport, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}
