use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// One JSON object per line: `{"frame", "time", "magnitudes"}`.
    Jsonl,
    /// Consecutive little-endian f32 arrays, `output_resolution` values each.
    Raw,
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameFormat::Jsonl => write!(f, "jsonl"),
            FrameFormat::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for FrameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "json" => Ok(FrameFormat::Jsonl),
            "raw" | "f32" => Ok(FrameFormat::Raw),
            other => Err(format!("unknown frame format '{}', expected jsonl or raw", other)),
        }
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: usize,
    time: f32,
    magnitudes: &'a [f32],
}

/// Streams analysed frames to any writer.
pub struct FrameWriter<W: Write> {
    out: W,
    format: FrameFormat,
    frames: usize,
}

impl FrameWriter<BufWriter<File>> {
    pub fn create(path: &Path, format: FrameFormat) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        log::info!("Writing {} frames to {}", format, path.display());
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W, format: FrameFormat) -> Self {
        Self {
            out,
            format,
            frames: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    pub fn write_frame(&mut self, time: f32, magnitudes: &[f32]) -> Result<()> {
        match self.format {
            FrameFormat::Jsonl => {
                let record = FrameRecord {
                    frame: self.frames,
                    time,
                    magnitudes,
                };
                serde_json::to_writer(&mut self.out, &record).context("Failed to encode frame")?;
                self.out.write_all(b"\n").context("Failed to write frame")?;
            }
            FrameFormat::Raw if cfg!(target_endian = "little") => {
                self.out
                    .write_all(bytemuck::cast_slice(magnitudes))
                    .context("Failed to write frame")?;
            }
            FrameFormat::Raw => {
                for value in magnitudes {
                    self.out.write_all(&value.to_le_bytes()).context("Failed to write frame")?;
                }
            }
        }
        self.frames += 1;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("Failed to flush frames")?;
        log::info!("Wrote {} frames", self.frames);
        Ok(self.out)
    }
}
