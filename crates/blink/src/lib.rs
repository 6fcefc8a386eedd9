//! Eye-blink vignette effect.
//!
//! Every output pixel is a background color darkened by a blink intensity.
//! The flow for one frame is:
//!
//! ```text
//!   FrameContext (pixel, resolution, time)
//!          │
//!          ├─▶ BackgroundSource::sample(uv) ─────────────┐
//!          │                                              ▼
//!          └─▶ BlinkEvaluator: vignette(uv) ^ (1 / wave(t)) ─▶ composite() ─▶ Rgba
//! ```
//!
//! `BlinkEffect` resolves the configured modes into strategy objects once;
//! `frame` is a small CPU host that evaluates whole frames in parallel, and
//! `runtime` supplies the frame times.

pub mod background;
pub mod compositor;
pub mod effect;
pub mod evaluator;
pub mod frame;
pub mod runtime;
mod types;
pub mod wave;

pub use background::{BackgroundSource, Texture, TextureError, TextureFilter, Textured, WhiteFill};
pub use compositor::composite;
pub use effect::{BlinkEffect, EffectSettings};
pub use evaluator::{
    intensity, normalize, vignette, BlinkEvaluator, EvalError, VIGNETTE_COEFFICIENT,
    VIGNETTE_PEAK,
};
pub use frame::{luminance, render_frame, render_intensity, FrameBuffer, FrameError, FrameStats};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, PolicyError, RenderPolicy,
    SteppedTimeSource, TimeSample, TimeSource,
};
pub use types::{
    BackgroundMode, BlinkMode, FrameContext, NormalizedCoord, OutputAlpha, PixelCoord,
    Resolution, Rgb, Rgba, WaveTuning,
};
pub use wave::{BlinkWaveFunction, SharpWave, SmoothWave};
