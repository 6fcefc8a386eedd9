//! CPU frame host.
//!
//! Invokes the effect once per pixel, sampling pixel centers with the origin
//! at the bottom-left like a fragment shader. Rows are independent and are
//! rendered in parallel; the output does not depend on scheduling.

use std::time::Instant;

use rayon::prelude::*;

use crate::effect::BlinkEffect;
use crate::evaluator::{normalize, BlinkEvaluator};
use crate::types::{FrameContext, PixelCoord, Resolution, Rgba};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame resolution {width}x{height} has no pixels")]
    EmptyResolution { width: u32, height: u32 },
}

/// Rendered frame, rows stored top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(column, row)` with row 0 at the top.
    pub fn pixel(&self, column: u32, row: u32) -> Option<Rgba> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }

    /// Packed `f32` RGBA bytes for handing the frame to a host.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Device-pixel center of `(column, row)`, measured from the bottom-left.
pub fn pixel_center(column: u32, row: u32, height: u32) -> PixelCoord {
    let from_bottom = height - 1 - row;
    PixelCoord::new(column as f32 + 0.5, from_bottom as f32 + 0.5)
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyResolution { width, height });
    }
    Ok(())
}

/// Renders a full frame of the effect at `time`.
pub fn render_frame(
    effect: &BlinkEffect,
    width: u32,
    height: u32,
    time: f32,
) -> Result<FrameBuffer, FrameError> {
    check_dimensions(width, height)?;
    let started = Instant::now();
    let resolution = Resolution::from((width, height));
    let wave = effect.evaluator().frame_wave(time);

    let mut pixels = vec![Rgba::default(); width as usize * height as usize];
    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(row, line)| {
            for (column, out) in line.iter_mut().enumerate() {
                let pixel = pixel_center(column as u32, row as u32, height);
                let ctx = FrameContext::new(resolution, time, pixel);
                *out = effect.shade_with_wave(&ctx, wave);
            }
        });

    tracing::debug!(
        width,
        height,
        time,
        wave,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "rendered blink frame"
    );

    Ok(FrameBuffer {
        width,
        height,
        pixels,
    })
}

/// Renders only the intensity field, rows top to bottom.
pub fn render_intensity(
    evaluator: &BlinkEvaluator,
    width: u32,
    height: u32,
    time: f32,
) -> Result<Vec<f32>, FrameError> {
    check_dimensions(width, height)?;
    let resolution = Resolution::from((width, height));
    let wave = evaluator.frame_wave(time);

    let mut field = vec![0.0_f32; width as usize * height as usize];
    field
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(row, line)| {
            for (column, out) in line.iter_mut().enumerate() {
                let uv = normalize(pixel_center(column as u32, row as u32, height), resolution);
                *out = evaluator.intensity_at(uv, wave);
            }
        });
    Ok(field)
}

/// Rec. 709 luma of a composited color.
pub fn luminance(color: Rgba) -> f32 {
    0.2126 * color.r + 0.7152 * color.g + 0.0722 * color.b
}

/// Summary of an intensity field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub samples: usize,
}

impl FrameStats {
    pub fn from_intensity(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let (min, max, sum) = values.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0_f64),
            |(min, max, sum), &value| (min.min(value), max.max(value), sum + value as f64),
        );
        Some(Self {
            min,
            max,
            mean: (sum / values.len() as f64) as f32,
            samples: values.len(),
        })
    }
}
