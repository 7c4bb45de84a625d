//! End-to-end checks over both backends: a pure tone must peak in the band
//! nearest its frequency, and the two backends must agree frame for frame.

use std::f32::consts::PI;

use goertzel_spectrum::spectrum::{bands, scale::AmplitudeScale};
use goertzel_spectrum::{create, Backend, BandScale, SpectrumConfig, DEFAULT_CAPACITY};

const SAMPLE_RATE: f32 = 48000.0;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn sine(freq: f32, amp: f32, offset: usize) -> Vec<f32> {
    (0..DEFAULT_CAPACITY)
        .map(|i| amp * (2.0 * PI * freq * (i + offset) as f32 / SAMPLE_RATE).sin())
        .collect()
}

/// Deterministic broadband signal: two tones plus LCG noise.
fn mixture(seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    (0..DEFAULT_CAPACITY)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5;
            let t = i as f32 / SAMPLE_RATE;
            0.6 * (2.0 * PI * 310.0 * t).sin() + 0.3 * (2.0 * PI * 1250.0 * t).sin() + 0.2 * noise
        })
        .collect()
}

fn tone_config(band_scale: BandScale) -> SpectrumConfig {
    SpectrumConfig {
        sample_rate: SAMPLE_RATE,
        output_resolution: 64,
        min_frequency_hz: 20.0,
        max_frequency_hz: 2000.0,
        // 42 ms at 48 kHz = 2016 samples
        audio_duration_ms: 42,
        output_multiplier_db: 20.0,
        smoothing_factor: 0.0,
        band_scale,
        ..Default::default()
    }
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap()
}

fn assert_close(a: &[f32], b: &[f32], context: &str) {
    assert_eq!(a.len(), b.len(), "{}", context);
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        let tolerance = 1e-4 * x.abs().max(y.abs()) + 1e-6;
        assert!((x - y).abs() <= tolerance, "{}: index {}: {} vs {}", context, i, x, y);
    }
}

// ─── Tone localisation ─────────────────────────────────────────────────────

#[test]
fn pure_tone_peaks_in_nearest_band() {
    let signal = sine(440.0, 1.0, 0);

    for band_scale in [BandScale::Legacy, BandScale::Linear] {
        let config = tone_config(band_scale);
        assert_eq!(config.fft_size(), 2016);

        let layout = band_scale.generate(64, 20.0, 2000.0);
        let nearest = layout
            .iter()
            .enumerate()
            .min_by(|a, b| {
                (a.1.analysed_hz() - 440.0)
                    .abs()
                    .total_cmp(&(b.1.analysed_hz() - 440.0).abs())
            })
            .map(|(i, _)| i)
            .unwrap();

        for backend in [Backend::Reference, Backend::Parallel] {
            let mut method = create(backend, config, Some(2)).unwrap();
            let out = method.process(&signal).unwrap();
            assert_eq!(out.len(), 64);
            assert!(out.iter().all(|&v| v >= 0.0 && v.is_finite()));

            let peak = argmax(&out);
            assert_eq!(peak, nearest, "{} / {:?}", backend, band_scale);

            let left = if peak > 0 { out[peak - 1] } else { 0.0 };
            let right = out.get(peak + 1).copied().unwrap_or(0.0);
            let neighbour = left.max(right);
            assert!(
                out[peak] > neighbour * 1.5 && out[peak] - neighbour > 0.5,
                "{} / {:?}: peak {} vs neighbour {}",
                backend,
                band_scale,
                out[peak],
                neighbour
            );
        }
    }
}

#[test]
fn legacy_layout_runs_high_to_low() {
    // 1800 Hz sits near the front of the legacy layout, 100 Hz near the back.
    let config = tone_config(BandScale::Legacy);
    let mut method = create(Backend::Reference, config, None).unwrap();

    let high = argmax(&method.process(&sine(1800.0, 1.0, 0)).unwrap());
    let low = argmax(&method.process(&sine(100.0, 1.0, 0)).unwrap());
    assert!(high < low, "high tone at {}, low tone at {}", high, low);

    let layout = bands::generate(64, 20.0, 2000.0);
    assert!((layout[high].analysed_hz() - 1800.0).abs() < 32.0);
    assert!((layout[low].analysed_hz() - 100.0).abs() < 32.0);
}

// ─── Backend equivalence ───────────────────────────────────────────────────

#[test]
fn backends_agree_on_default_settings() {
    let config = SpectrumConfig {
        output_multiplier_db: 12.0,
        ..Default::default()
    };
    let mut reference = create(Backend::Reference, config, None).unwrap();
    let mut parallel = create(Backend::Parallel, config, Some(4)).unwrap();

    for seed in 0..4 {
        let signal = mixture(seed);
        let a = reference.process(&signal).unwrap();
        let b = parallel.process(&signal).unwrap();
        assert_close(&a, &b, &format!("seed {}", seed));
    }
}

#[test]
fn backends_agree_with_every_stage_enabled() {
    let configs = [
        SpectrumConfig {
            output_resolution: 97,
            min_frequency_hz: 30.0,
            max_frequency_hz: 4000.0,
            audio_duration_ms: 80,
            output_multiplier_db: 18.0,
            smoothing_factor: 0.6,
            window_skew: 0.3,
            tilt_amount: 3.0,
            weight_amount: 1.0,
            band_scale: BandScale::Linear,
            amplitude: AmplitudeScale {
                nth_root: 2.0,
                db_range: 60.0,
                use_absolute_floor: false,
            },
            ..Default::default()
        },
        SpectrumConfig {
            output_resolution: 13,
            audio_duration_ms: 5,
            output_multiplier_db: 30.0,
            smoothing_factor: 0.8,
            retain_history: false,
            ..Default::default()
        },
    ];

    for (n, config) in configs.into_iter().enumerate() {
        let mut reference = create(Backend::Reference, config, None).unwrap();
        let mut parallel = create(Backend::Parallel, config, Some(3)).unwrap();

        // Several frames so the held smoothing state is compared too.
        for frame in 0..5 {
            let signal = mixture(frame * 7 + 1);
            let a = reference.process(&signal).unwrap();
            let b = parallel.process(&signal).unwrap();
            assert_close(&a, &b, &format!("config {} frame {}", n, frame));
        }
    }
}

#[test]
fn backends_agree_after_reconfigure() {
    let mut reference = create(Backend::Reference, SpectrumConfig::default(), None).unwrap();
    let mut parallel = create(Backend::Parallel, SpectrumConfig::default(), Some(2)).unwrap();

    let config = tone_config(BandScale::Linear);
    for method in [&mut reference, &mut parallel] {
        method.configure(config);
        method.prepare().unwrap();
        assert_eq!(method.config(), &config);
    }

    let signal = sine(440.0, 0.5, 123);
    let a = reference.process(&signal).unwrap();
    let b = parallel.process(&signal).unwrap();
    assert_close(&a, &b, "reconfigured");
}

#[test]
fn negative_curves_keep_dc_band_finite() {
    // Default range starts at 0 Hz, so the last legacy band sits on DC.
    let variants = [
        SpectrumConfig {
            tilt_amount: -3.0,
            ..Default::default()
        },
        SpectrumConfig {
            weight_amount: -1.0,
            ..Default::default()
        },
    ];

    for base in variants {
        let config = SpectrumConfig {
            output_multiplier_db: 20.0,
            smoothing_factor: 0.5,
            ..base
        };
        assert!(config.validate().is_ok());
        let layout = bands::generate(config.output_resolution, config.min_frequency_hz, config.max_frequency_hz);
        assert_eq!(layout[config.output_resolution - 1].analysed_hz(), 0.0);

        for backend in [Backend::Reference, Backend::Parallel] {
            let mut method = create(backend, config, Some(2)).unwrap();
            for frame in 0..3 {
                let out = method.process(&mixture(frame + 11)).unwrap();
                assert!(
                    out.iter().all(|v| v.is_finite() && *v >= 0.0),
                    "{} frame {}: {:?}",
                    backend,
                    frame,
                    out.iter().enumerate().filter(|(_, v)| !v.is_finite()).collect::<Vec<_>>()
                );
                assert_eq!(out[config.output_resolution - 1], 0.0);
            }
        }
    }
}

// ─── Smoothing across frames ───────────────────────────────────────────────

#[test]
fn smoothing_attack_and_release() {
    let config = SpectrumConfig {
        smoothing_factor: 0.7,
        ..tone_config(BandScale::Linear)
    };
    let signal = sine(440.0, 1.0, 0);
    let silence = vec![0.0; DEFAULT_CAPACITY];

    for backend in [Backend::Reference, Backend::Parallel] {
        let mut method = create(backend, config, Some(2)).unwrap();
        let mut peaks = Vec::new();
        for _ in 0..6 {
            let out = method.process(&signal).unwrap();
            peaks.push(out[argmax(&out)]);
        }
        assert!(peaks.windows(2).all(|w| w[1] >= w[0]), "{}: attack {:?}", backend, peaks);

        let mut released = Vec::new();
        for _ in 0..6 {
            let out = method.process(&silence).unwrap();
            released.push(out.iter().copied().fold(0.0f32, f32::max));
        }
        assert!(released.windows(2).all(|w| w[1] <= w[0]), "{}: release {:?}", backend, released);
        assert!(released[5] < peaks[5]);
    }
}
