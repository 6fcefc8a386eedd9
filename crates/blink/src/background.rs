//! Background sources the blink mask is composited over.
//!
//! Textures live entirely in memory. Rows are stored top to bottom, while
//! normalized coordinates grow upwards from the bottom-left corner, so
//! sampling flips `v` the same way an uploaded image is flipped before it
//! reaches a shader.

use crate::types::{BackgroundMode, NormalizedCoord, Rgb};

/// Supplies the color behind the vignette for a normalized coordinate.
pub trait BackgroundSource: Send + Sync {
    fn sample(&self, uv: NormalizedCoord) -> Rgb;

    fn mode(&self) -> BackgroundMode;
}

/// Constant white background.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteFill;

impl BackgroundSource for WhiteFill {
    fn sample(&self, _uv: NormalizedCoord) -> Rgb {
        Rgb::WHITE
    }

    fn mode(&self) -> BackgroundMode {
        BackgroundMode::WhiteFill
    }
}

/// Texture-backed background.
#[derive(Debug, Clone)]
pub struct Textured {
    texture: Texture,
}

impl Textured {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

impl BackgroundSource for Textured {
    fn sample(&self, uv: NormalizedCoord) -> Rgb {
        self.texture.sample(uv)
    }

    fn mode(&self) -> BackgroundMode {
        BackgroundMode::Textured
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("texture {width}x{height} expects {expected} texels, got {actual}")]
    TexelCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("texture {width}x{height} exceeds the {max}-texel limit per axis")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("checkerboard needs at least one cell per axis")]
    NoCells,
}

/// Sampler filtering applied between texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// In-memory RGB texture with clamp-to-edge addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Rgb>,
    filter: TextureFilter,
}

impl Texture {
    /// Largest accepted width or height.
    pub const MAX_DIMENSION: u32 = 16384;

    fn texel_count(width: u32, height: u32) -> Result<usize, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyDimensions { width, height });
        }
        if width > Self::MAX_DIMENSION || height > Self::MAX_DIMENSION {
            return Err(TextureError::TooLarge {
                width,
                height,
                max: Self::MAX_DIMENSION,
            });
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(TextureError::TooLarge {
                width,
                height,
                max: Self::MAX_DIMENSION,
            })
    }

    pub fn new(width: u32, height: u32, texels: Vec<Rgb>) -> Result<Self, TextureError> {
        let expected = Self::texel_count(width, height)?;
        if texels.len() != expected {
            return Err(TextureError::TexelCount {
                width,
                height,
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
            filter: TextureFilter::default(),
        })
    }

    /// Builds a texture by evaluating `f(column, row)` for every texel, row 0 on top.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgb,
    ) -> Result<Self, TextureError> {
        let mut texels = Vec::with_capacity(Self::texel_count(width, height)?);
        for row in 0..height {
            for column in 0..width {
                texels.push(f(column, row));
            }
        }
        Self::new(width, height, texels)
    }

    /// Square checkerboard with `cells` squares along each axis.
    pub fn checkerboard(
        width: u32,
        height: u32,
        cells: u32,
        first: Rgb,
        second: Rgb,
    ) -> Result<Self, TextureError> {
        if cells == 0 {
            return Err(TextureError::NoCells);
        }
        let cell_w = (width / cells).max(1);
        let cell_h = (height / cells).max(1);
        Self::from_fn(width, height, |column, row| {
            if ((column / cell_w) + (row / cell_h)) % 2 == 0 {
                first
            } else {
                second
            }
        })
    }

    /// Diagonal gradient from `start` (bottom-left) to `end` (top-right).
    pub fn gradient(width: u32, height: u32, start: Rgb, end: Rgb) -> Result<Self, TextureError> {
        let span = (u64::from(width) + u64::from(height)).saturating_sub(2).max(1) as f32;
        Self::from_fn(width, height, |column, row| {
            let from_bottom = height - 1 - row;
            start.lerp(end, (u64::from(column) + u64::from(from_bottom)) as f32 / span)
        })
    }

    /// Grey checkerboard used when a textured background has no texture.
    pub fn placeholder() -> Self {
        Self {
            width: 2,
            height: 2,
            texels: vec![
                Rgb::new(0.75, 0.75, 0.75),
                Rgb::new(0.25, 0.25, 0.25),
                Rgb::new(0.25, 0.25, 0.25),
                Rgb::new(0.75, 0.75, 0.75),
            ],
            filter: TextureFilter::Nearest,
        }
    }

    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    /// Texel at `(column, row)`, row 0 on top, clamped to the edges.
    pub fn texel(&self, column: i64, row: i64) -> Rgb {
        let column = column.clamp(0, self.width as i64 - 1) as usize;
        let row = row.clamp(0, self.height as i64 - 1) as usize;
        self.texels[row * self.width as usize + column]
    }

    pub fn sample(&self, uv: NormalizedCoord) -> Rgb {
        let u = if uv.u.is_nan() { 0.0 } else { uv.u };
        let v = if uv.v.is_nan() { 0.0 } else { uv.v };
        // Texel space with rows counted from the top, clamped to one texel
        // past each edge.
        let (width, height) = (self.width as f32, self.height as f32);
        let x = (u * width).clamp(-1.0, width + 1.0);
        let y = ((1.0 - v) * height).clamp(-1.0, height + 1.0);
        match self.filter {
            TextureFilter::Nearest => self.texel(x.floor() as i64, y.floor() as i64),
            TextureFilter::Linear => {
                let x = x - 0.5;
                let y = y - 0.5;
                let x0 = x.floor();
                let y0 = y.floor();
                let fx = x - x0;
                let fy = y - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
                let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
                top.lerp(bottom, fy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn white_fill_is_constant() {
        let source = WhiteFill;
        for (u, v) in [(0.0, 0.0), (0.5, 0.5), (1.0, 0.3)] {
            assert_eq!(source.sample(NormalizedCoord::new(u, v)), Rgb::WHITE);
        }
        assert_eq!(source.mode(), BackgroundMode::WhiteFill);
    }

    #[test]
    fn texture_rejects_bad_shapes() {
        assert_eq!(
            Texture::new(0, 4, vec![]).unwrap_err(),
            TextureError::EmptyDimensions {
                width: 0,
                height: 4
            }
        );
        assert!(matches!(
            Texture::new(2, 2, vec![Rgb::WHITE; 3]),
            Err(TextureError::TexelCount {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        assert_eq!(
            Texture::checkerboard(8, 8, 0, Rgb::WHITE, Rgb::BLACK).unwrap_err(),
            TextureError::NoCells
        );
    }

    #[test]
    fn nearest_sampling_flips_rows() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let blue = Rgb::new(0.0, 0.0, 1.0);
        let texture = Texture::new(1, 2, vec![red, blue])
            .unwrap()
            .with_filter(TextureFilter::Nearest);
        // Row 0 is the top of the image, which is v close to 1.
        assert_eq!(texture.sample(NormalizedCoord::new(0.5, 0.9)), red);
        assert_eq!(texture.sample(NormalizedCoord::new(0.5, 0.1)), blue);
    }

    #[test]
    fn linear_sampling_blends_neighbours() {
        let texture = Texture::new(2, 1, vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        let mid = texture.sample(NormalizedCoord::new(0.5, 0.5));
        assert!(close(mid, Rgb::new(0.5, 0.5, 0.5)));
        let left = texture.sample(NormalizedCoord::new(0.25, 0.5));
        assert!(close(left, Rgb::BLACK));
    }

    #[test]
    fn sampling_clamps_to_edges() {
        let texture = Texture::new(2, 1, vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        assert!(close(texture.sample(NormalizedCoord::new(-3.0, 0.5)), Rgb::BLACK));
        assert!(close(texture.sample(NormalizedCoord::new(4.0, 2.0)), Rgb::WHITE));
        assert!(close(
            texture.sample(NormalizedCoord::new(f32::NAN, 0.5)),
            Rgb::BLACK
        ));
    }

    #[test]
    fn far_and_infinite_coordinates_sample_the_edge() {
        let texture = Texture::new(2, 1, vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        for filter in [TextureFilter::Linear, TextureFilter::Nearest] {
            let texture = texture.clone().with_filter(filter);
            for u in [1e20, f32::MAX, f32::INFINITY] {
                assert_eq!(texture.sample(NormalizedCoord::new(u, 0.5)), Rgb::WHITE);
                assert_eq!(texture.sample(NormalizedCoord::new(-u, 0.5)), Rgb::BLACK);
            }
            assert_eq!(
                texture.sample(NormalizedCoord::new(0.0, f32::NEG_INFINITY)),
                Rgb::BLACK
            );
        }
    }

    #[test]
    fn oversized_textures_are_rejected_before_allocating() {
        let err = Texture::checkerboard(u32::MAX, u32::MAX, 8, Rgb::WHITE, Rgb::BLACK).unwrap_err();
        assert!(matches!(err, TextureError::TooLarge { .. }), "{err:?}");
        let err = Texture::gradient(u32::MAX, 1, Rgb::BLACK, Rgb::WHITE).unwrap_err();
        assert!(matches!(err, TextureError::TooLarge { .. }), "{err:?}");
        assert!(matches!(
            Texture::new(Texture::MAX_DIMENSION + 1, 1, vec![]),
            Err(TextureError::TooLarge { .. })
        ));
        let widest = Texture::from_fn(Texture::MAX_DIMENSION, 1, |_, _| Rgb::WHITE).unwrap();
        assert_eq!(widest.width(), Texture::MAX_DIMENSION);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let texture = Texture::checkerboard(4, 4, 2, Rgb::WHITE, Rgb::BLACK).unwrap();
        assert_eq!(texture.texel(0, 0), Rgb::WHITE);
        assert_eq!(texture.texel(2, 0), Rgb::BLACK);
        assert_eq!(texture.texel(0, 2), Rgb::BLACK);
        assert_eq!(texture.texel(3, 3), Rgb::WHITE);
    }

    #[test]
    fn gradient_runs_from_bottom_left_to_top_right() {
        let texture = Texture::gradient(3, 3, Rgb::BLACK, Rgb::WHITE).unwrap();
        assert!(close(texture.texel(0, 2), Rgb::BLACK));
        assert!(close(texture.texel(2, 0), Rgb::WHITE));
    }

    #[test]
    fn textured_source_reports_mode() {
        let source = Textured::new(Texture::placeholder());
        assert_eq!(source.mode(), BackgroundMode::Textured);
        assert_eq!(source.texture().width(), 2);
    }
}
