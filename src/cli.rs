use clap::Parser;
use std::path::PathBuf;

use goertzel_spectrum::encode::frames::FrameFormat;
use goertzel_spectrum::{Backend, DEFAULT_CAPACITY};

#[derive(Parser, Debug)]
#[command(name = "goertzel-spectrum", about = "Per-frame Goertzel loudness curves for audio visualisers")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output file for the analysed frames
    #[arg(short, long, default_value = "spectrum.jsonl")]
    pub output: PathBuf,

    /// Output encoding: jsonl or raw (packed f32)
    #[arg(long, default_value = "jsonl")]
    pub format: FrameFormat,

    /// Analysis frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Analysis backend: reference or parallel
    #[arg(short, long, default_value = "parallel")]
    pub backend: Backend,

    /// Worker threads for the parallel backend (default: one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of output bands
    #[arg(short, long, default_value_t = 200)]
    pub resolution: usize,

    /// Lower end of the analysed range (Hz)
    #[arg(long, default_value_t = 0.0)]
    pub min_freq: f32,

    /// Upper end of the analysed range (Hz)
    #[arg(long, default_value_t = 2000.0)]
    pub max_freq: f32,

    /// Length of the analysed tail of the buffer (ms)
    #[arg(long, default_value_t = 40)]
    pub duration_ms: u32,

    /// Output gain (dB)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub multiplier_db: f32,

    /// Smoothing time constant (0.0-1.0)
    #[arg(long, default_value_t = 0.0)]
    pub smoothing: f32,

    /// Window skew (>= 0)
    #[arg(long, default_value_t = 0.0)]
    pub skew: f32,

    /// Capacity of the rolling sample buffer
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Spread bands linearly from --min-freq to --max-freq
    #[arg(long)]
    pub linear_bands: bool,

    /// Blend every frame against silence instead of the previous frame
    #[arg(long)]
    pub no_history: bool,

    /// Settings file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the effective spectrum settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
