use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl FrequencyBand {
    /// Frequency the Goertzel filter for this band actually responds to.
    /// The coefficient is even in frequency, so a negative centre analyses `|mid|`.
    pub fn analysed_hz(&self) -> f32 {
        self.mid.abs()
    }
}

/// How band indices map onto the configured frequency range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandScale {
    /// Uses [`remap`] as-is. Centres run from `2 * min - max` (index 0) up to
    /// `min` (last index), so the analysed frequencies descend across the array.
    #[default]
    Legacy,
    /// Plain linear interpolation: index 0 is `min`, the last index is `max`.
    Linear,
}

impl BandScale {
    fn map(self, x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
        match self {
            BandScale::Legacy => remap(x, in_min, in_max, out_min, out_max),
            BandScale::Linear => {
                let t = (x - in_min) / (in_max - in_min);
                out_min * (1.0 - t) + out_max * t
            }
        }
    }

    pub fn generate(self, count: usize, min: f32, max: f32) -> Vec<FrequencyBand> {
        let last = count as f32 - 1.0;
        (0..count)
            .map(|i| {
                let i = i as f32;
                FrequencyBand {
                    low: self.map(i - 0.5, 0.0, last, min, max),
                    mid: self.map(i, 0.0, last, min, max),
                    high: self.map(i + 0.5, 0.0, last, min, max),
                }
            })
            .collect()
    }
}

/// The range mapping every stage of the pipeline shares.
///
/// Note the numerator subtracts `in_max`, not `in_min`: `in_max` maps to
/// `out_min` and `in_min` maps to `2 * out_min - out_max`. Band layout and
/// amplitude scaling both depend on this exact shape.
pub fn remap(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_max) / (in_max - in_min) * (out_max - out_min) + out_min
}

pub fn generate(count: usize, min: f32, max: f32) -> Vec<FrequencyBand> {
    BandScale::Legacy.generate(count, min, max)
}
