//! Blink wave strategies.
//!
//! A blink wave is a non-negative periodic scalar that drives how sharply the
//! vignette collapses. Large values leave the background untouched ("eyes
//! open"); values near zero crush everything to black ("eyes closed"). Both
//! shapes touch zero at `time * speed = nπ`.

use crate::types::{BlinkMode, WaveTuning};

/// Capability interface for the time-dependent half of the effect.
pub trait BlinkWaveFunction: Send + Sync {
    /// Raw wave value at `time` seconds. May be exactly zero.
    fn sample(&self, time: f32) -> f32;

    /// Value reached at `time * speed = π/2 + nπ`.
    fn peak(&self) -> f32;

    /// Short label used in logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// `|sin(t·speed)| · amplitude`; reaches zero with non-zero slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpWave {
    pub speed: f32,
    pub amplitude: f32,
}

impl SharpWave {
    pub fn new(speed: f32, amplitude: f32) -> Self {
        Self { speed, amplitude }
    }
}

impl Default for SharpWave {
    fn default() -> Self {
        Self::new(
            WaveTuning::DEFAULT_SPEED,
            WaveTuning::DEFAULT_SHARP_AMPLITUDE,
        )
    }
}

impl BlinkWaveFunction for SharpWave {
    fn sample(&self, time: f32) -> f32 {
        (time * self.speed).sin().abs() * self.amplitude
    }

    fn peak(&self) -> f32 {
        self.amplitude
    }

    fn name(&self) -> &'static str {
        "sharp"
    }
}

/// `sin²(t·speed) · amplitude`; flattens out before each blink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothWave {
    pub speed: f32,
    pub amplitude: f32,
}

impl SmoothWave {
    pub fn new(speed: f32, amplitude: f32) -> Self {
        Self { speed, amplitude }
    }
}

impl Default for SmoothWave {
    fn default() -> Self {
        Self::new(
            WaveTuning::DEFAULT_SPEED,
            WaveTuning::DEFAULT_SMOOTH_AMPLITUDE,
        )
    }
}

impl BlinkWaveFunction for SmoothWave {
    fn sample(&self, time: f32) -> f32 {
        let s = (time * self.speed).sin();
        s * s * self.amplitude
    }

    fn peak(&self) -> f32 {
        self.amplitude
    }

    fn name(&self) -> &'static str {
        "smooth"
    }
}

impl BlinkMode {
    /// Builds the strategy object for this mode.
    pub fn wave_function(self, tuning: &WaveTuning) -> Box<dyn BlinkWaveFunction> {
        match self {
            BlinkMode::Sharp => Box::new(SharpWave::new(tuning.speed, tuning.sharp_amplitude)),
            BlinkMode::Smooth => Box::new(SmoothWave::new(tuning.speed, tuning.smooth_amplitude)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sharp_wave_zeros_and_peaks() {
        let wave = SharpWave::default();
        for n in 0..4 {
            let n = n as f32;
            assert!(close(wave.sample(n * PI), 0.0, 1e-4), "zero at {n}π");
            assert!(close(wave.sample(FRAC_PI_2 + n * PI), 32.0, 1e-3));
        }
        assert_eq!(wave.peak(), 32.0);
    }

    #[test]
    fn smooth_wave_zeros_and_peaks() {
        let wave = SmoothWave::default();
        for n in 0..4 {
            let n = n as f32;
            assert!(close(wave.sample(n * PI), 0.0, 1e-4));
            assert!(close(wave.sample(FRAC_PI_2 + n * PI), 64.0, 1e-3));
        }
        assert_eq!(wave.peak(), 64.0);
    }

    #[test]
    fn both_waves_have_period_pi() {
        let sharp = SharpWave::default();
        let smooth = SmoothWave::default();
        for step in 0..20 {
            let t = step as f32 * 0.17;
            assert!(close(sharp.sample(t), sharp.sample(t + PI), 1e-3));
            assert!(close(smooth.sample(t), smooth.sample(t + PI), 1e-3));
        }
    }

    #[test]
    fn waves_never_go_negative() {
        let sharp = SharpWave::default();
        let smooth = SmoothWave::default();
        for step in -100..100 {
            let t = step as f32 * 0.093;
            assert!(sharp.sample(t) >= 0.0);
            assert!(smooth.sample(t) >= 0.0);
        }
    }

    #[test]
    fn smooth_wave_approaches_zero_flat_sharp_does_not() {
        let h = 1e-3;
        let sharp_slope = SharpWave::default().sample(h) / h;
        let smooth_slope = SmoothWave::default().sample(h) / h;
        assert!(close(sharp_slope, 32.0, 0.1), "sharp slope {sharp_slope}");
        assert!(smooth_slope < 0.1, "smooth slope {smooth_slope}");
    }

    #[test]
    fn mode_selects_strategy_with_tuning() {
        let tuning = WaveTuning {
            speed: 2.0,
            sharp_amplitude: 10.0,
            smooth_amplitude: 20.0,
            floor: 1e-4,
        };
        let sharp = BlinkMode::Sharp.wave_function(&tuning);
        let smooth = BlinkMode::Smooth.wave_function(&tuning);
        assert_eq!(sharp.name(), "sharp");
        assert_eq!(smooth.name(), "smooth");
        assert!(close(sharp.sample(PI / 4.0), 10.0, 1e-4));
        assert!(close(smooth.sample(PI / 4.0), 20.0, 1e-4));
    }
}
