mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use goertzel_spectrum::audio::capture::SampleBuffer;
use goertzel_spectrum::audio::decode;
use goertzel_spectrum::encode::frames::FrameWriter;
use goertzel_spectrum::{spectrum, SpectrumConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Settings file values apply only where the CLI is at its default
    let base = match config::find_config_path(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                config::merge(&mut cli, cfg)
            }
            Err(err) => {
                log::warn!("{:#}", err);
                SpectrumConfig::default()
            }
        },
        None => SpectrumConfig::default(),
    };
    let settings = config::spectrum_config(&cli, base);

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&settings).context("Failed to serialize settings")?);
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    if cli.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    // 1. Decode audio
    let audio = decode::decode_mono(input)?;

    // 2. Build the backend once for the whole run
    let settings = config::clamp_to_capacity(
        SpectrumConfig {
            sample_rate: audio.sample_rate as f32,
            ..settings
        },
        cli.capacity,
    );
    settings
        .validate_for_capacity(cli.capacity)
        .context("Spectrum settings rejected")?;
    let mut method = spectrum::create(cli.backend, settings, cli.threads)
        .context("Failed to prepare spectrum backend")?;

    log::info!(
        "Backend: {}, {} bands over {}-{}Hz ({:?}), window {} samples",
        method.name(),
        settings.output_resolution,
        settings.min_frequency_hz,
        settings.max_frequency_hz,
        settings.band_scale,
        settings.fft_size()
    );

    // 3. Feed the rolling buffer one frame tick at a time
    let samples_per_frame = audio.sample_rate as f64 / cli.fps as f64;
    let total_frames = (audio.samples.len() as f64 / samples_per_frame).ceil() as usize;
    log::info!("Total frames: {} @ {}fps, duration {:.1}s", total_frames, cli.fps, audio.duration_secs());

    let mut buffer = SampleBuffer::new(cli.capacity);
    let mut writer = FrameWriter::create(&cli.output, cli.format)?;

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );

    let mut consumed = 0usize;
    for frame_idx in 0..total_frames {
        let end = (((frame_idx + 1) as f64 * samples_per_frame).round() as usize).min(audio.samples.len());
        buffer.push(&audio.samples[consumed..end]);
        consumed = end;

        let magnitudes = method
            .process(buffer.as_slice())
            .with_context(|| format!("Failed to analyse frame {}", frame_idx))?;
        writer.write_frame(frame_idx as f32 / cli.fps as f32, &magnitudes)?;
        pb.set_position(frame_idx as u64 + 1);
    }

    pb.finish_with_message("Analysis complete");
    writer.finish()?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}
