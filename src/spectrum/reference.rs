use super::config::SpectrumConfig;
use super::error::SpectrumError;
use super::smoothing::SmoothingState;
use super::{goertzel, silent_frame, weighting, window, SpectrumMethod};

/// Straightforward implementation: every stage is a sequential loop and
/// bands are regenerated on each call.
pub struct ReferenceBackend {
    config: SpectrumConfig,
    prepared: bool,
    smoothing: SmoothingState,
}

impl ReferenceBackend {
    pub fn new(config: SpectrumConfig) -> Self {
        Self {
            config,
            prepared: false,
            smoothing: SmoothingState::default(),
        }
    }
}

impl SpectrumMethod for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    fn configure(&mut self, config: SpectrumConfig) {
        self.config = config;
        self.prepared = false;
    }

    fn prepare(&mut self) -> Result<(), SpectrumError> {
        self.config.validate()?;
        self.smoothing = SmoothingState::new(self.config.output_resolution, self.config.retain_history);
        self.prepared = true;
        log::debug!(
            "Prepared reference backend: {} bands, {} samples/window",
            self.config.output_resolution,
            self.config.fft_size()
        );
        Ok(())
    }

    fn process(&mut self, samples: &[f32]) -> Result<Vec<f32>, SpectrumError> {
        if !self.prepared {
            return Err(SpectrumError::NotPrepared);
        }
        let cfg = self.config;

        // 1. Windowed, normalised tail
        let windowed = match window::analysis_window(samples, cfg.fft_size(), cfg.window_skew) {
            Ok(w) => w,
            Err(SpectrumError::DegenerateInput(reason)) => return Ok(silent_frame(&cfg, &reason)),
            Err(e) => return Err(e),
        };

        // 2-3. Raw band magnitudes
        let bands = cfg
            .band_scale
            .generate(cfg.output_resolution, cfg.min_frequency_hz, cfg.max_frequency_hz);
        let mut magnitudes: Vec<f32> = bands
            .iter()
            .map(|band| goertzel::magnitude(&windowed, goertzel::coefficient(band.mid, cfg.sample_rate)))
            .collect();

        // 4. Gain, tilt, weighting
        for (m, band) in magnitudes.iter_mut().zip(&bands) {
            *m = weighting::adjust(
                *m,
                band.analysed_hz(),
                cfg.output_multiplier_db,
                cfg.tilt_amount,
                cfg.weight_amount,
            );
        }

        // 5. Smoothing against the held frame
        self.smoothing.apply(&mut magnitudes, cfg.smoothing_factor);

        // 6. Output scaling
        for m in magnitudes.iter_mut() {
            *m = cfg.amplitude.apply(*m);
        }

        Ok(magnitudes)
    }
}
