use crate::background::{BackgroundSource, Texture, Textured, WhiteFill};
use crate::compositor::composite;
use crate::evaluator::{normalize, BlinkEvaluator};
use crate::types::{BackgroundMode, BlinkMode, FrameContext, OutputAlpha, Rgba, WaveTuning};

/// Effect configuration resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct EffectSettings {
    pub blink_mode: BlinkMode,
    pub background_mode: BackgroundMode,
    /// Texture for [`BackgroundMode::Textured`]; ignored for white fill.
    pub texture: Option<Texture>,
    pub tuning: WaveTuning,
    pub alpha: OutputAlpha,
}

/// The complete eye-blink effect: background, intensity and compositing.
///
/// Modes are turned into strategy objects in [`BlinkEffect::new`], so shading
/// a pixel never branches on configuration.
pub struct BlinkEffect {
    evaluator: BlinkEvaluator,
    background: Box<dyn BackgroundSource>,
    alpha: OutputAlpha,
    blink_mode: BlinkMode,
}

impl BlinkEffect {
    pub fn new(settings: EffectSettings) -> Self {
        let EffectSettings {
            blink_mode,
            background_mode,
            texture,
            tuning,
            alpha,
        } = settings;

        let evaluator = BlinkEvaluator::new(blink_mode.wave_function(&tuning), tuning.floor);
        let background: Box<dyn BackgroundSource> = match background_mode {
            BackgroundMode::WhiteFill => Box::new(WhiteFill),
            BackgroundMode::Textured => {
                let texture = texture.unwrap_or_else(|| {
                    tracing::warn!("textured background requested without a texture; using placeholder");
                    Texture::placeholder()
                });
                Box::new(Textured::new(texture))
            }
        };

        tracing::debug!(
            blink = %blink_mode,
            background = %background_mode,
            speed = tuning.speed,
            floor = evaluator.floor(),
            ?alpha,
            "blink effect configured"
        );

        Self {
            evaluator,
            background,
            alpha,
            blink_mode,
        }
    }

    pub fn evaluator(&self) -> &BlinkEvaluator {
        &self.evaluator
    }

    pub fn background(&self) -> &dyn BackgroundSource {
        self.background.as_ref()
    }

    pub fn blink_mode(&self) -> BlinkMode {
        self.blink_mode
    }

    pub fn alpha(&self) -> OutputAlpha {
        self.alpha
    }

    /// Final color for one pixel.
    pub fn shade(&self, ctx: &FrameContext) -> Rgba {
        self.shade_with_wave(ctx, self.evaluator.frame_wave(ctx.time))
    }

    /// Same as [`shade`](Self::shade) with the frame wave computed by the caller.
    pub fn shade_with_wave(&self, ctx: &FrameContext, wave: f32) -> Rgba {
        let uv = normalize(ctx.pixel, ctx.resolution);
        let intensity = self.evaluator.intensity_at(uv, wave);
        composite(self.background.sample(uv), intensity, self.alpha)
    }
}

impl std::fmt::Debug for BlinkEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkEffect")
            .field("evaluator", &self.evaluator)
            .field("background", &self.background.mode())
            .field("alpha", &self.alpha)
            .finish()
    }
}
