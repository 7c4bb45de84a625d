use std::f32::consts::PI;

use super::error::SpectrumError;

const MIN_NORM_SUM: f32 = 1e-12;

/// Skewable raised-cosine weight for `pos_x` in `-1.0..=1.0`.
///
/// With `skew == 0.0` this is a symmetric Hamming-style curve. A positive
/// skew warps the slope so the peak moves towards the newest samples; with
/// `truncate` set, positions warped past the edge get zero weight.
pub fn weight(pos_x: f32, skew: f32, truncate: bool) -> f32 {
    let warp = 10.0 * skew.powi(2);
    let x = if skew > 0.0 {
        let t = pos_x / 2.0 - 0.5;
        (t / (1.0 - t * warp)) / (1.0 / (1.0 + warp)) * 2.0 + 1.0
    } else {
        let t = pos_x / 2.0 + 0.5;
        (t / (1.0 + t * warp)) / (1.0 / (1.0 + warp)) * 2.0 - 1.0
    };

    if truncate && x.abs() > 1.0 {
        return 0.0;
    }

    0.54 + 0.46 * (x * PI).cos()
}

fn position(i: usize, size: usize) -> f32 {
    i as f32 * 2.0 / (size - 1) as f32 - 1.0
}

/// Window the last `fft_size` samples of `samples` and rescale so the
/// average energy matches the unwindowed signal.
pub fn analysis_window(samples: &[f32], fft_size: usize, skew: f32) -> Result<Vec<f32>, SpectrumError> {
    let tail = tail(samples, fft_size)?;

    let mut windowed = vec![0.0f32; fft_size];
    let mut norm_sum = 0.0f32;
    for (i, (out, &sample)) in windowed.iter_mut().zip(tail).enumerate() {
        let w = weight(position(i, fft_size), skew, true);
        *out = sample * w;
        norm_sum += w;
    }

    let gain = normalization_gain(fft_size, norm_sum)?;
    for value in windowed.iter_mut() {
        *value *= gain;
    }
    Ok(windowed)
}

pub fn tail(samples: &[f32], fft_size: usize) -> Result<&[f32], SpectrumError> {
    if fft_size < 2 {
        return Err(SpectrumError::InvalidConfiguration(format!(
            "analysis window needs at least 2 samples, got {}",
            fft_size
        )));
    }
    if fft_size > samples.len() {
        return Err(SpectrumError::BufferTooShort {
            needed: fft_size,
            available: samples.len(),
        });
    }
    Ok(&samples[samples.len() - fft_size..])
}

fn normalization_gain(fft_size: usize, norm_sum: f32) -> Result<f32, SpectrumError> {
    if !norm_sum.is_finite() || norm_sum <= MIN_NORM_SUM {
        return Err(SpectrumError::DegenerateInput(format!(
            "window weights sum to {} over {} samples",
            norm_sum, fft_size
        )));
    }
    Ok(fft_size as f32 / norm_sum)
}

#[derive(Debug, Clone)]
pub struct WindowTable {
    weights: Vec<f32>,
    norm_sum: f32,
}

impl WindowTable {
    pub fn new(fft_size: usize, skew: f32) -> Self {
        let weights: Vec<f32> = (0..fft_size)
            .map(|i| weight(position(i, fft_size), skew, true))
            .collect();
        // Same accumulation order as `analysis_window`.
        let mut norm_sum = 0.0f32;
        for &w in &weights {
            norm_sum += w;
        }
        Self { weights, norm_sum }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn norm_sum(&self) -> f32 {
        self.norm_sum
    }

    /// Writes the windowed, normalised tail of `samples` into `out`.
    /// `out` is resized to the window length.
    pub fn apply(&self, samples: &[f32], out: &mut Vec<f32>) -> Result<(), SpectrumError> {
        let tail = tail(samples, self.weights.len())?;
        let gain = normalization_gain(self.weights.len(), self.norm_sum)?;

        out.clear();
        out.resize(self.weights.len(), 0.0);

        // Straight zips over equal-length slices so the loops vectorise.
        for ((o, &s), &w) in out.iter_mut().zip(tail).zip(&self.weights) {
            *o = s * w;
        }
        for o in out.iter_mut() {
            *o *= gain;
        }
        Ok(())
    }
}
