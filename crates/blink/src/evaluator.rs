//! Per-pixel blink intensity.
//!
//! The intensity field is `vignette ^ (1 / wave)`: a separable biquadratic
//! bump raised to an exponent that swings between almost zero (eyes open,
//! intensity ≈ 1) and very large (eyes closed, intensity ≈ 0).

use crate::types::{NormalizedCoord, PixelCoord, Resolution, WaveTuning};
use crate::wave::BlinkWaveFunction;

/// Parabola coefficient of each axis; `k / 4` is the peak of the mask.
pub const VIGNETTE_COEFFICIENT: f32 = 3.9;

/// Mask value at the frame center.
pub const VIGNETTE_PEAK: f32 = VIGNETTE_COEFFICIENT / 4.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvalError {
    #[error("resolution {width}x{height} must be finite and greater than zero")]
    InvalidResolution { width: f32, height: f32 },
    #[error("time must be finite (got {0})")]
    NonFiniteTime(f32),
}

/// Maps device pixels onto the unit square.
pub fn normalize(pixel: PixelCoord, resolution: Resolution) -> NormalizedCoord {
    NormalizedCoord::new(pixel.x / resolution.width, pixel.y / resolution.height)
}

/// Separable biquadratic mask: zero on every edge, [`VIGNETTE_PEAK`] at the center.
pub fn vignette(uv: NormalizedCoord) -> f32 {
    let horizontal = (4.0 * uv.u * (1.0 - uv.u)).max(0.0);
    let vertical = (4.0 * uv.v * (1.0 - uv.v)).max(0.0);
    VIGNETTE_PEAK * horizontal * vertical
}

/// Raises `vignette` to `1 / max(wave, floor)` and clamps into `[0, 1]`.
pub fn intensity(vignette: f32, wave: f32, floor: f32) -> f32 {
    // NaN waves fall through `max` to the floor.
    let wave = wave.max(floor);
    let value = vignette.max(0.0).powf(wave.recip());
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Evaluates the blink intensity with a selected wave strategy.
pub struct BlinkEvaluator {
    wave: Box<dyn BlinkWaveFunction>,
    floor: f32,
}

impl BlinkEvaluator {
    pub fn new(wave: Box<dyn BlinkWaveFunction>, floor: f32) -> Self {
        let floor = if floor.is_finite() && floor > 0.0 {
            floor
        } else {
            tracing::warn!(floor, "invalid wave floor; using default");
            WaveTuning::DEFAULT_FLOOR
        };
        Self { wave, floor }
    }

    pub fn wave_name(&self) -> &'static str {
        self.wave.name()
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Raw wave value for a frame. Every pixel of that frame shares it.
    pub fn frame_wave(&self, time: f32) -> f32 {
        self.wave.sample(time)
    }

    /// Intensity for an already-normalized coordinate and frame wave.
    pub fn intensity_at(&self, uv: NormalizedCoord, wave: f32) -> f32 {
        intensity(vignette(uv), wave, self.floor)
    }

    /// Full evaluation for one pixel. Never fails; a non-positive resolution
    /// is the caller's responsibility.
    pub fn evaluate(&self, pixel: PixelCoord, resolution: Resolution, time: f32) -> f32 {
        self.intensity_at(normalize(pixel, resolution), self.frame_wave(time))
    }

    /// Like [`evaluate`](Self::evaluate) but rejects inputs outside the contract.
    pub fn try_evaluate(
        &self,
        pixel: PixelCoord,
        resolution: Resolution,
        time: f32,
    ) -> Result<f32, EvalError> {
        if !resolution.is_valid() {
            return Err(EvalError::InvalidResolution {
                width: resolution.width,
                height: resolution.height,
            });
        }
        if !time.is_finite() {
            return Err(EvalError::NonFiniteTime(time));
        }
        Ok(self.evaluate(pixel, resolution, time))
    }
}

impl std::fmt::Debug for BlinkEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkEvaluator")
            .field("wave", &self.wave.name())
            .field("floor", &self.floor)
            .finish()
    }
}
