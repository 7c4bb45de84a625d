//! Goertzel loudness curve: one mono sample buffer in, one array of
//! non-negative band magnitudes out.
//!
//! Stages, in order: tail windowing ([`window`]), per-band Goertzel
//! magnitudes over [`bands`] ([`goertzel`]), gain/tilt/weighting
//! ([`weighting`]), smoothing against the held frame ([`smoothing`]) and
//! amplitude scaling ([`scale`]). Two backends run the same stages:
//! [`ReferenceBackend`] with plain sequential loops and [`ParallelBackend`]
//! on a rayon pool with precomputed tables.

pub mod bands;
pub mod config;
pub mod error;
pub mod goertzel;
pub mod parallel;
pub mod reference;
pub mod scale;
pub mod smoothing;
pub mod weighting;
pub mod window;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use bands::{BandScale, FrequencyBand};
pub use config::{SpectrumConfig, DEFAULT_CAPACITY};
pub use error::SpectrumError;
pub use parallel::ParallelBackend;
pub use reference::ReferenceBackend;
pub use scale::AmplitudeScale;

/// Common interface of the analysis backends.
///
/// Call [`configure`](Self::configure), then [`prepare`](Self::prepare),
/// then [`process`](Self::process) once per frame. Changing the
/// configuration invalidates the preparation.
pub trait SpectrumMethod: Send {
    fn name(&self) -> &'static str;

    fn config(&self) -> &SpectrumConfig;

    fn configure(&mut self, config: SpectrumConfig);

    /// Validates the configuration, builds per-configuration tables and
    /// clears the smoothing history. Calling it twice is harmless.
    fn prepare(&mut self) -> Result<(), SpectrumError>;

    /// Analyses the tail of `samples`. Blocks until the frame is complete.
    fn process(&mut self, samples: &[f32]) -> Result<Vec<f32>, SpectrumError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Reference,
    #[default]
    Parallel,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Reference => write!(f, "reference"),
            Backend::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "ref" => Ok(Backend::Reference),
            "parallel" | "par" => Ok(Backend::Parallel),
            other => Err(format!("unknown backend '{}', expected reference or parallel", other)),
        }
    }
}

pub fn create(
    backend: Backend,
    config: SpectrumConfig,
    threads: Option<usize>,
) -> Result<Box<dyn SpectrumMethod>, SpectrumError> {
    let mut method: Box<dyn SpectrumMethod> = match backend {
        Backend::Reference => Box::new(ReferenceBackend::new(config)),
        Backend::Parallel => Box::new(ParallelBackend::with_threads(config, threads)),
    };
    method.prepare()?;
    Ok(method)
}

/// Zero-filled frame returned when the analysis window is degenerate.
fn silent_frame(config: &SpectrumConfig, reason: &str) -> Vec<f32> {
    log::warn!("Skipping degenerate frame: {}", reason);
    vec![0.0; config.output_resolution]
}
