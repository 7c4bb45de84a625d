pub const TILT_CENTER_HZ: f32 = 440.0;

pub fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Log-frequency tilt: `amount` dB per octave away from `center_hz`.
/// An `amount` of zero is exactly neutral. DC has no octave position, so it
/// is muted whenever the tilt is active.
pub fn frequency_tilt(freq_hz: f32, center_hz: f32, amount: f32) -> f32 {
    if amount == 0.0 {
        1.0
    } else if freq_hz <= 0.0 {
        0.0
    } else {
        10f32.powf((freq_hz / center_hz).log2() * amount / 20.0)
    }
}

/// IEC 61672 A-weighting gain raised to `amount`. `amount == 0` yields 1,
/// and DC (where the curve is zero) stays at 0 for any other amount.
pub fn perceptual_weight(freq_hz: f32, amount: f32) -> f32 {
    if amount == 0.0 {
        return 1.0;
    }
    if freq_hz <= 0.0 {
        return 0.0;
    }
    let f2 = freq_hz * freq_hz;
    let numerator = 1.258_896_6 * 148_840_000.0 * (f2 * f2);
    let denominator = (f2 + 424.36)
        * ((f2 + 11_599.29) * (f2 + 544_496.41)).sqrt()
        * (f2 + 148_840_000.0);
    (numerator / denominator).powf(amount)
}

/// Combined gain applied to a band centred at `freq_hz`. A gain that
/// overflows (steep negative curves near DC) mutes the band.
pub fn band_gain(freq_hz: f32, output_multiplier_db: f32, tilt_amount: f32, weight_amount: f32) -> f32 {
    let gain = db_to_linear(output_multiplier_db)
        * frequency_tilt(freq_hz, TILT_CENTER_HZ, tilt_amount)
        * perceptual_weight(freq_hz, weight_amount);
    if gain.is_finite() {
        gain
    } else {
        0.0
    }
}

/// Gain, tilt and perceptual weighting for one raw band magnitude.
pub fn adjust(
    raw_magnitude: f32,
    freq_hz: f32,
    output_multiplier_db: f32,
    tilt_amount: f32,
    weight_amount: f32,
) -> f32 {
    raw_magnitude * band_gain(freq_hz, output_multiplier_db, tilt_amount, weight_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_db(x: f32) -> f32 {
        20.0 * x.log10()
    }

    #[test]
    fn db_conversion() {
        assert_eq!(db_to_linear(0.0), 1.0);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-5);
        assert!((db_to_linear(-6.0) - 0.501_187).abs() < 1e-5);
    }

    #[test]
    fn zero_amounts_are_neutral() {
        for &f in &[0.0f32, 20.0, 440.0, 1000.0, 19_000.0] {
            assert_eq!(frequency_tilt(f, TILT_CENTER_HZ, 0.0), 1.0);
            assert_eq!(perceptual_weight(f, 0.0), 1.0);
            assert_eq!(adjust(0.37, f, 0.0, 0.0, 0.0), 0.37);
        }
    }

    #[test]
    fn tilt_is_per_octave() {
        assert!((frequency_tilt(440.0, 440.0, 3.0) - 1.0).abs() < 1e-6);
        assert!((to_db(frequency_tilt(880.0, 440.0, 3.0)) - 3.0).abs() < 1e-3);
        assert!((to_db(frequency_tilt(110.0, 440.0, 3.0)) + 6.0).abs() < 1e-3);
    }

    #[test]
    fn a_weighting_reference_points() {
        // IEC 61672-1 table values (dB).
        for &(freq, expected) in &[(1000.0f32, 0.0f32), (100.0, -19.1), (10_000.0, -2.5), (50.0, -30.2)] {
            let got = to_db(perceptual_weight(freq, 1.0));
            assert!((got - expected).abs() < 0.15, "{} Hz: {} dB", freq, got);
        }
    }

    #[test]
    fn dc_band_gain_stays_finite() {
        for &(tilt, weight) in &[(-3.0f32, 0.0f32), (0.0, -1.0), (-3.0, -1.0), (3.0, 1.0)] {
            assert_eq!(band_gain(0.0, 20.0, tilt, weight), 0.0, "tilt {} weight {}", tilt, weight);
        }
        // Steep negative curves just above DC overflow and are muted too.
        assert_eq!(band_gain(1e-3, 0.0, 0.0, -20.0), 0.0);
        assert!(band_gain(0.5, 0.0, -3.0, -1.0).is_finite());
        assert_eq!(band_gain(0.0, 20.0, 0.0, 0.0), db_to_linear(20.0));
    }

    #[test]
    fn gain_scales_magnitude() {
        let adjusted = adjust(0.5, 1000.0, 20.0, 0.0, 0.0);
        assert!((adjusted - 5.0).abs() < 1e-4);
    }
}
