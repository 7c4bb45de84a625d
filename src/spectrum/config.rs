use serde::{Deserialize, Serialize};

use super::bands::BandScale;
use super::error::SpectrumError;
use super::scale::AmplitudeScale;

/// Capacity of the rolling sample buffer the host captures into.
pub const DEFAULT_CAPACITY: usize = 8196;

/// Settings for one analysis run. Rebuild the backend plan (`prepare`)
/// whenever any of these change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    pub sample_rate: f32,
    pub output_resolution: usize,
    pub output_multiplier_db: f32,
    pub min_frequency_hz: f32,
    pub max_frequency_hz: f32,
    /// Length of the analysed tail of the sample buffer.
    pub audio_duration_ms: u32,
    /// Weight of the held frame when blending (0.0-1.0).
    pub smoothing_factor: f32,
    pub window_skew: f32,
    /// Exponent of the log-frequency tilt curve. 0 disables it.
    pub tilt_amount: f32,
    /// Exponent of the A-weighting curve. 0 disables it.
    pub weight_amount: f32,
    pub band_scale: BandScale,
    /// Keep the previous frame for smoothing. When false every frame is
    /// blended against silence, which only attenuates.
    pub retain_history: bool,
    pub amplitude: AmplitudeScale,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            output_resolution: 200,
            output_multiplier_db: 0.0,
            min_frequency_hz: 0.0,
            max_frequency_hz: 2000.0,
            audio_duration_ms: 40,
            smoothing_factor: 0.0,
            window_skew: 0.0,
            tilt_amount: 0.0,
            weight_amount: 0.0,
            band_scale: BandScale::default(),
            retain_history: true,
            amplitude: AmplitudeScale::default(),
        }
    }
}

impl SpectrumConfig {
    pub fn fft_size(&self) -> usize {
        let size = (self.audio_duration_ms as f32 * (self.sample_rate * 0.001)).round();
        if size.is_finite() && size > 0.0 {
            size as usize
        } else {
            0
        }
    }

    /// Rejects configurations that would divide by zero or index out of range
    /// somewhere in the pipeline.
    pub fn validate(&self) -> Result<(), SpectrumError> {
        let invalid = |msg: String| Err(SpectrumError::InvalidConfiguration(msg));

        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return invalid(format!("sample rate must be positive, got {}", self.sample_rate));
        }
        if self.output_resolution < 2 {
            return invalid(format!(
                "output resolution must be at least 2, got {}",
                self.output_resolution
            ));
        }
        let fft_size = self.fft_size();
        if fft_size < 2 {
            return invalid(format!(
                "{} ms at {} Hz yields {} samples, need at least 2",
                self.audio_duration_ms, self.sample_rate, fft_size
            ));
        }
        if !(self.min_frequency_hz >= 0.0 && self.max_frequency_hz >= 0.0) {
            return invalid(format!(
                "frequency range must be non-negative, got {}..{}",
                self.min_frequency_hz, self.max_frequency_hz
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return invalid(format!(
                "smoothing factor must be within 0.0-1.0, got {}",
                self.smoothing_factor
            ));
        }
        if !(self.window_skew >= 0.0) {
            return invalid(format!("window skew must be >= 0, got {}", self.window_skew));
        }
        if !self.output_multiplier_db.is_finite()
            || !self.tilt_amount.is_finite()
            || !self.weight_amount.is_finite()
        {
            return invalid("gain, tilt and weight must be finite".into());
        }
        self.amplitude.validate()
    }

    /// Like [`validate`](Self::validate), plus the check that the window fits
    /// in a buffer of `capacity` samples.
    pub fn validate_for_capacity(&self, capacity: usize) -> Result<(), SpectrumError> {
        self.validate()?;
        let needed = self.fft_size();
        if needed > capacity {
            return Err(SpectrumError::BufferTooShort {
                needed,
                available: capacity,
            });
        }
        Ok(())
    }

    pub fn max_duration_ms(sample_rate: f32, capacity: usize) -> u32 {
        if sample_rate <= 0.0 {
            return 0;
        }
        (capacity as f32 / (sample_rate * 0.001)).floor() as u32
    }
}
