use std::f32::consts::PI;

pub const LANES: usize = 8;

pub fn coefficient(freq_hz: f32, sample_rate: f32) -> f32 {
    2.0 * (2.0 * PI * freq_hz / sample_rate).cos()
}

/// Single-bin Goertzel magnitude of `samples`, normalised by their length.
///
/// A sinusoid of amplitude `A` sitting on the analysed frequency reads as
/// roughly `A / 2`.
pub fn magnitude(samples: &[f32], coefficient: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut s1 = 0.0f32;
    let mut s2 = 0.0f32;
    for &x in samples {
        let s0 = x + coefficient * s1 - s2;
        s2 = s1;
        s1 = s0;
    }

    finish(s1, s2, coefficient, samples.len())
}

/// Runs up to [`LANES`] bands over the same samples in one pass.
///
/// Each lane performs exactly the arithmetic of [`magnitude`], so results
/// are bit-identical to the scalar path. Unused lanes (when `coefficients`
/// is shorter than `LANES`) come back as 0.0.
pub fn magnitudes_lanes(samples: &[f32], coefficients: &[f32]) -> [f32; LANES] {
    let mut out = [0.0f32; LANES];
    if samples.is_empty() {
        return out;
    }

    let active = coefficients.len().min(LANES);
    let mut coeff = [0.0f32; LANES];
    coeff[..active].copy_from_slice(&coefficients[..active]);

    let mut s1 = [0.0f32; LANES];
    let mut s2 = [0.0f32; LANES];
    for &x in samples {
        for lane in 0..LANES {
            let s0 = x + coeff[lane] * s1[lane] - s2[lane];
            s2[lane] = s1[lane];
            s1[lane] = s0;
        }
    }

    for lane in 0..active {
        out[lane] = finish(s1[lane], s2[lane], coeff[lane], samples.len());
    }
    out
}

#[inline]
fn finish(s1: f32, s2: f32, coefficient: f32, len: usize) -> f32 {
    // Rounding can push the energy a hair below zero.
    let power = (s1 * s1 + s2 * s2 - coefficient * s1 * s2).max(0.0);
    power.sqrt() / len as f32
}
