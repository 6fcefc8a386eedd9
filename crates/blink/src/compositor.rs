use crate::types::{OutputAlpha, Rgb, Rgba};

/// Darkens `background` by `intensity` and attaches the configured alpha.
pub fn composite(background: Rgb, intensity: f32, alpha: OutputAlpha) -> Rgba {
    let rgb = background.scale(intensity);
    Rgba::new(rgb.r, rgb.g, rgb.b, alpha.value())
}
