use bytemuck::{Pod, Zeroable};

/// Linear RGB triple sampled from a background source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Component-wise scale by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(value: [f32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

/// Output color written to the frame target.
///
/// The layout is four packed `f32` values so frame buffers can be handed to a
/// host as raw bytes without conversion.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Frame size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

impl Resolution {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both axes are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

/// Pixel position in device pixels, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelCoord {
    pub x: f32,
    pub y: f32,
}

impl PixelCoord {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel position rescaled onto the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedCoord {
    pub u: f32,
    pub v: f32,
}

impl NormalizedCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// Per-invocation inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub resolution: Resolution,
    pub time: f32,
    pub pixel: PixelCoord,
}

impl FrameContext {
    pub fn new(resolution: Resolution, time: f32, pixel: PixelCoord) -> Self {
        Self {
            resolution,
            time,
            pixel,
        }
    }
}

/// Selects the blink wave shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkMode {
    /// `|sin|` wave: abrupt collapse and recovery.
    Sharp,
    /// `sin²` wave: approaches each blink with zero slope.
    Smooth,
}

impl Default for BlinkMode {
    fn default() -> Self {
        if cfg!(feature = "smooth-blink") {
            BlinkMode::Smooth
        } else {
            BlinkMode::Sharp
        }
    }
}

impl std::fmt::Display for BlinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlinkMode::Sharp => f.write_str("sharp"),
            BlinkMode::Smooth => f.write_str("smooth"),
        }
    }
}

/// Selects where the background color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    /// Sample an in-memory texture.
    Textured,
    /// Constant white.
    WhiteFill,
}

impl Default for BackgroundMode {
    fn default() -> Self {
        if cfg!(feature = "textured-background") {
            BackgroundMode::Textured
        } else {
            BackgroundMode::WhiteFill
        }
    }
}

impl std::fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundMode::Textured => f.write_str("textured"),
            BackgroundMode::WhiteFill => f.write_str("white"),
        }
    }
}

/// Declares what the compositor writes into the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputAlpha {
    /// Alpha fixed at 0; the effect's default coverage.
    #[default]
    Transparent,
    /// Alpha fixed at 1 for hosts that need opaque frames.
    Opaque,
}

impl OutputAlpha {
    pub fn value(self) -> f32 {
        match self {
            OutputAlpha::Transparent => 0.0,
            OutputAlpha::Opaque => 1.0,
        }
    }
}

/// Numeric knobs of the blink wave.
///
/// Defaults reproduce the classic effect: one blink every π seconds, with the
/// smooth variant at twice the sharp amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTuning {
    pub speed: f32,
    pub sharp_amplitude: f32,
    pub smooth_amplitude: f32,
    /// Lower bound applied to the wave before it becomes an exponent divisor.
    pub floor: f32,
}

impl WaveTuning {
    pub const DEFAULT_SPEED: f32 = 1.0;
    pub const DEFAULT_SHARP_AMPLITUDE: f32 = 32.0;
    pub const DEFAULT_SMOOTH_AMPLITUDE: f32 = 64.0;
    pub const DEFAULT_FLOOR: f32 = 1e-4;
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            sharp_amplitude: Self::DEFAULT_SHARP_AMPLITUDE,
            smooth_amplitude: Self::DEFAULT_SMOOTH_AMPLITUDE,
            floor: Self::DEFAULT_FLOOR,
        }
    }
}
