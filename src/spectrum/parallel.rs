use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::config::SpectrumConfig;
use super::error::SpectrumError;
use super::goertzel::{self, LANES};
use super::smoothing::SmoothingState;
use super::window::WindowTable;
use super::{silent_frame, weighting, SpectrumMethod};

/// Per-configuration state built by `prepare`.
struct Plan {
    pool: ThreadPool,
    window: WindowTable,
    coefficients: Vec<f32>,
    gains: Vec<f32>,
}

impl Plan {
    fn build(config: &SpectrumConfig, threads: Option<usize>) -> Result<Self, SpectrumError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("goertzel-{}", i));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;

        let bands = config
            .band_scale
            .generate(config.output_resolution, config.min_frequency_hz, config.max_frequency_hz);
        let coefficients = bands
            .iter()
            .map(|band| goertzel::coefficient(band.mid, config.sample_rate))
            .collect();
        let gains = bands
            .iter()
            .map(|band| {
                weighting::band_gain(
                    band.analysed_hz(),
                    config.output_multiplier_db,
                    config.tilt_amount,
                    config.weight_amount,
                )
            })
            .collect();

        Ok(Self {
            pool,
            window: WindowTable::new(config.fft_size(), config.window_skew),
            coefficients,
            gains,
        })
    }
}

/// Batch backend: window, coefficients and gains are tabulated once in
/// `prepare`, bands run [`LANES`] at a time on a dedicated rayon pool.
pub struct ParallelBackend {
    config: SpectrumConfig,
    threads: Option<usize>,
    plan: Option<Plan>,
    smoothing: SmoothingState,
}

impl ParallelBackend {
    pub fn new(config: SpectrumConfig) -> Self {
        Self::with_threads(config, None)
    }

    /// `threads == None` lets rayon pick one worker per core.
    pub fn with_threads(config: SpectrumConfig, threads: Option<usize>) -> Self {
        Self {
            config,
            threads,
            plan: None,
            smoothing: SmoothingState::default(),
        }
    }

    pub fn threads(&self) -> Option<usize> {
        self.plan.as_ref().map(|plan| plan.pool.current_num_threads())
    }
}

impl SpectrumMethod for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    fn configure(&mut self, config: SpectrumConfig) {
        self.config = config;
        self.plan = None;
    }

    fn prepare(&mut self) -> Result<(), SpectrumError> {
        self.config.validate()?;
        let plan = Plan::build(&self.config, self.threads)?;
        log::debug!(
            "Prepared parallel backend: {} bands, {} samples/window, {} workers",
            plan.coefficients.len(),
            plan.window.len(),
            plan.pool.current_num_threads()
        );
        self.plan = Some(plan);
        self.smoothing = SmoothingState::new(self.config.output_resolution, self.config.retain_history);
        Ok(())
    }

    fn process(&mut self, samples: &[f32]) -> Result<Vec<f32>, SpectrumError> {
        let plan = self.plan.as_ref().ok_or(SpectrumError::NotPrepared)?;
        let cfg = &self.config;

        let mut scratch = Vec::with_capacity(plan.window.len());
        match plan.window.apply(samples, &mut scratch) {
            Ok(()) => {}
            Err(SpectrumError::DegenerateInput(reason)) => return Ok(silent_frame(cfg, &reason)),
            Err(e) => return Err(e),
        }

        let mut magnitudes = vec![0.0f32; plan.coefficients.len()];
        let windowed = scratch.as_slice();
        plan.pool.install(|| {
            plan.coefficients
                .par_chunks(LANES)
                .zip(magnitudes.par_chunks_mut(LANES))
                .for_each(|(coeffs, out)| {
                    let lanes = goertzel::magnitudes_lanes(windowed, coeffs);
                    out.copy_from_slice(&lanes[..out.len()]);
                });
        });
        drop(scratch);

        for (m, &gain) in magnitudes.iter_mut().zip(&plan.gains) {
            *m *= gain;
        }

        self.smoothing.apply(&mut magnitudes, cfg.smoothing_factor);

        let amplitude = cfg.amplitude;
        for m in magnitudes.iter_mut() {
            *m = amplitude.apply(*m);
        }

        Ok(magnitudes)
    }
}
