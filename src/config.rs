use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use goertzel_spectrum::encode::frames::FrameFormat;
use goertzel_spectrum::{Backend, BandScale, SpectrumConfig, DEFAULT_CAPACITY};

use crate::cli::Cli;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Overrides for any spectrum field, including ones without a CLI flag
    /// (tilt, weighting, amplitude curve).
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            format: default_format(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            threads: None,
            capacity: default_capacity(),
        }
    }
}

fn default_fps() -> u32 { 60 }
fn default_format() -> String { "jsonl".into() }
fn default_backend() -> String { "parallel".into() }
fn default_capacity() -> usize { DEFAULT_CAPACITY }

/// Explicit path, else `goertzel-spectrum.toml` in the working directory,
/// else the per-user config file.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("goertzel-spectrum.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("goertzel-spectrum").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("goertzel-spectrum").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Fill CLI options still at their defaults from the file. Returns the
/// file's spectrum settings as the base for [`spectrum_config`].
pub fn merge(cli: &mut Cli, cfg: Config) -> SpectrumConfig {
    if cli.fps == default_fps() { cli.fps = cfg.output.fps; }
    if cli.format == FrameFormat::Jsonl {
        match cfg.output.format.parse() {
            Ok(format) => cli.format = format,
            Err(e) => log::warn!("Ignoring output.format: {}", e),
        }
    }
    if cli.backend == Backend::Parallel {
        match cfg.analysis.backend.parse() {
            Ok(backend) => cli.backend = backend,
            Err(e) => log::warn!("Ignoring analysis.backend: {}", e),
        }
    }
    if cli.threads.is_none() { cli.threads = cfg.analysis.threads; }
    if cli.capacity == DEFAULT_CAPACITY { cli.capacity = cfg.analysis.capacity; }

    let file = cfg.spectrum;
    let defaults = SpectrumConfig::default();
    if cli.resolution == defaults.output_resolution { cli.resolution = file.output_resolution; }
    if cli.min_freq == defaults.min_frequency_hz { cli.min_freq = file.min_frequency_hz; }
    if cli.max_freq == defaults.max_frequency_hz { cli.max_freq = file.max_frequency_hz; }
    if cli.duration_ms == defaults.audio_duration_ms { cli.duration_ms = file.audio_duration_ms; }
    if cli.multiplier_db == defaults.output_multiplier_db { cli.multiplier_db = file.output_multiplier_db; }
    if cli.smoothing == defaults.smoothing_factor { cli.smoothing = file.smoothing_factor; }
    if cli.skew == defaults.window_skew { cli.skew = file.window_skew; }
    if !cli.linear_bands { cli.linear_bands = file.band_scale == BandScale::Linear; }
    if !cli.no_history { cli.no_history = !file.retain_history; }
    file
}

/// Apply the CLI's spectrum options on top of `base`.
pub fn spectrum_config(cli: &Cli, base: SpectrumConfig) -> SpectrumConfig {
    SpectrumConfig {
        output_resolution: cli.resolution,
        min_frequency_hz: cli.min_freq,
        max_frequency_hz: cli.max_freq,
        audio_duration_ms: cli.duration_ms,
        output_multiplier_db: cli.multiplier_db,
        smoothing_factor: cli.smoothing,
        window_skew: cli.skew,
        band_scale: if cli.linear_bands { BandScale::Linear } else { BandScale::Legacy },
        retain_history: !cli.no_history,
        ..base
    }
}

/// Pull user settings into the ranges the analysis accepts: duration must
/// fit in `capacity` samples, frequencies and skew are non-negative and
/// smoothing is a 0.0-1.0 blend.
pub fn clamp_to_capacity(mut config: SpectrumConfig, capacity: usize) -> SpectrumConfig {
    let max_ms = SpectrumConfig::max_duration_ms(config.sample_rate, capacity);
    if config.audio_duration_ms > max_ms {
        log::warn!(
            "Duration {}ms exceeds the {}-sample buffer at {}Hz, using {}ms",
            config.audio_duration_ms,
            capacity,
            config.sample_rate,
            max_ms
        );
        config.audio_duration_ms = max_ms;
    }
    config.min_frequency_hz = config.min_frequency_hz.max(0.0);
    config.max_frequency_hz = config.max_frequency_hz.max(0.0);
    config.window_skew = config.window_skew.max(0.0);
    config.smoothing_factor = config.smoothing_factor.clamp(0.0, 1.0);
    config
}
