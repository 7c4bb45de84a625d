use serde::{Deserialize, Serialize};

use super::bands::remap;
use super::error::SpectrumError;
use super::weighting::db_to_linear;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeScale {
    /// Root applied before mapping; 1.0 is linear.
    pub nth_root: f32,
    /// Floor below full scale, in dB. Ignored with `use_absolute_floor`.
    pub db_range: f32,
    pub use_absolute_floor: bool,
}

impl Default for AmplitudeScale {
    fn default() -> Self {
        Self {
            nth_root: 1.0,
            db_range: 70.0,
            use_absolute_floor: true,
        }
    }
}

impl AmplitudeScale {
    pub fn floor(&self) -> f32 {
        if self.use_absolute_floor {
            0.0
        } else {
            db_to_linear(-self.db_range).powf(1.0 / self.nth_root)
        }
    }

    pub fn apply(&self, x: f32) -> f32 {
        scale(x, self.nth_root, self.db_range, self.use_absolute_floor)
    }

    pub fn validate(&self) -> Result<(), SpectrumError> {
        if !(self.nth_root > 0.0) || !self.nth_root.is_finite() {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "nth root must be positive, got {}",
                self.nth_root
            )));
        }
        if !self.use_absolute_floor && !(self.db_range > 0.0) {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "dB range must be positive, got {}",
                self.db_range
            )));
        }
        Ok(())
    }
}

/// Root-compress `x` and map it through the shared [`remap`] between the
/// floor and 1.0, clamped at zero. NaN maps to zero.
pub fn scale(x: f32, nth_root: f32, db_range: f32, use_absolute_floor: bool) -> f32 {
    let floor = if use_absolute_floor {
        0.0
    } else {
        db_to_linear(-db_range).powf(1.0 / nth_root)
    };
    remap(x.powf(1.0 / nth_root), floor, 1.0, 0.0, 1.0).max(0.0)
}
