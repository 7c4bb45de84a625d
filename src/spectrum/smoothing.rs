#[inline]
fn nan_to_zero(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x
    }
}

/// Element-wise `target * factor + source * (1 - factor)`. NaNs in either
/// input count as zero.
pub fn smooth(target: &[f32], source: &[f32], factor: f32) -> Vec<f32> {
    let mut out = target.to_vec();
    smooth_into(&mut out, source, factor);
    out
}

pub fn smooth_into(target: &mut [f32], source: &[f32], factor: f32) {
    debug_assert_eq!(target.len(), source.len());
    for (t, &s) in target.iter_mut().zip(source) {
        *t = nan_to_zero(*t) * factor + nan_to_zero(s) * (1.0 - factor);
    }
}

/// Previous smoothed frame, kept between `process` calls.
///
/// The smoothing factor weights the held frame, so 0.0 passes each new
/// frame straight through and values near 1.0 respond slowly.
#[derive(Debug, Clone, Default)]
pub struct SmoothingState {
    held: Vec<f32>,
    retain: bool,
}

impl SmoothingState {
    pub fn new(bands: usize, retain: bool) -> Self {
        Self {
            held: vec![0.0; bands],
            retain,
        }
    }

    pub fn reset(&mut self) {
        self.held.fill(0.0);
    }

    pub fn held(&self) -> &[f32] {
        &self.held
    }

    /// Replaces `frame` with its blend against the held frame and, when
    /// history is retained, keeps the result for the next call.
    pub fn apply(&mut self, frame: &mut [f32], factor: f32) {
        if self.held.len() != frame.len() {
            self.held = vec![0.0; frame.len()];
        }
        if !self.retain {
            self.held.fill(0.0);
        }
        smooth_into(&mut self.held, frame, factor);
        frame.copy_from_slice(&self.held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_one_keeps_target() {
        let a = [0.1, 2.0, -3.5, 0.0];
        let b = [9.0, 8.0, 7.0, 6.0];
        assert_eq!(smooth(&a, &b, 1.0), a.to_vec());
    }

    #[test]
    fn factor_zero_takes_source() {
        let a = [0.1, 2.0, -3.5, 0.0];
        let b = [9.0, 8.0, 7.0, 6.0];
        assert_eq!(smooth(&a, &b, 0.0), b.to_vec());
    }

    #[test]
    fn nan_inputs_are_zeroed() {
        let out = smooth(&[f32::NAN, 1.0], &[2.0, f32::NAN], 0.5);
        assert_eq!(out, vec![1.0, 0.5]);
    }

    #[test]
    fn retained_history_decays_towards_input() {
        let mut state = SmoothingState::new(2, true);
        let mut frame = [1.0, 0.0];
        state.apply(&mut frame, 0.5);
        assert_eq!(frame, [0.5, 0.0]);

        let mut frame = [1.0, 0.0];
        state.apply(&mut frame, 0.5);
        assert_eq!(frame, [0.75, 0.0]);

        let mut frame = [0.0, 0.0];
        state.apply(&mut frame, 0.5);
        assert_eq!(frame, [0.375, 0.0]);
        assert_eq!(state.held(), &[0.375, 0.0]);

        state.reset();
        assert_eq!(state.held(), &[0.0, 0.0]);
    }

    #[test]
    fn without_history_smoothing_only_attenuates() {
        let mut state = SmoothingState::new(1, false);
        for _ in 0..3 {
            let mut frame = [0.8];
            state.apply(&mut frame, 0.25);
            assert!((frame[0] - 0.6).abs() < 1e-7);
        }
    }
}
