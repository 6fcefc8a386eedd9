use blink::{
    BackgroundMode, BlinkMode, OutputAlpha, Rgb, Texture, TextureError, TextureFilter,
    WaveTuning,
};
use blinkconfig::{
    AlphaSetting, BackgroundModeSetting, BlinkModeSetting, BlinkSection, FilterSetting,
    PatternSetting, TextureSection,
};

pub fn map_blink_mode(mode: BlinkModeSetting) -> BlinkMode {
    match mode {
        BlinkModeSetting::Sharp => BlinkMode::Sharp,
        BlinkModeSetting::Smooth => BlinkMode::Smooth,
    }
}

pub fn blink_mode_setting(mode: BlinkMode) -> BlinkModeSetting {
    match mode {
        BlinkMode::Sharp => BlinkModeSetting::Sharp,
        BlinkMode::Smooth => BlinkModeSetting::Smooth,
    }
}

pub fn map_background_mode(mode: BackgroundModeSetting) -> BackgroundMode {
    match mode {
        BackgroundModeSetting::White => BackgroundMode::WhiteFill,
        BackgroundModeSetting::Textured => BackgroundMode::Textured,
    }
}

pub fn background_mode_setting(mode: BackgroundMode) -> BackgroundModeSetting {
    match mode {
        BackgroundMode::WhiteFill => BackgroundModeSetting::White,
        BackgroundMode::Textured => BackgroundModeSetting::Textured,
    }
}

pub fn map_alpha(alpha: AlphaSetting) -> OutputAlpha {
    match alpha {
        AlphaSetting::Transparent => OutputAlpha::Transparent,
        AlphaSetting::Opaque => OutputAlpha::Opaque,
    }
}

pub fn alpha_setting(alpha: OutputAlpha) -> AlphaSetting {
    match alpha {
        OutputAlpha::Transparent => AlphaSetting::Transparent,
        OutputAlpha::Opaque => AlphaSetting::Opaque,
    }
}

fn map_filter(filter: FilterSetting) -> TextureFilter {
    match filter {
        FilterSetting::Nearest => TextureFilter::Nearest,
        FilterSetting::Linear => TextureFilter::Linear,
    }
}

/// Applies `[blink]` overrides on top of the default tuning.
pub fn tuning_from_section(section: &BlinkSection) -> WaveTuning {
    let defaults = WaveTuning::default();
    WaveTuning {
        speed: section.speed.unwrap_or(defaults.speed),
        sharp_amplitude: section.sharp_amplitude.unwrap_or(defaults.sharp_amplitude),
        smooth_amplitude: section
            .smooth_amplitude
            .unwrap_or(defaults.smooth_amplitude),
        floor: section.wave_floor.unwrap_or(defaults.floor),
    }
}

/// Generates the procedural texture described by `[background.texture]`.
pub fn texture_from_section(section: &TextureSection) -> Result<Texture, TextureError> {
    let [first, second] = section.colors;
    let (first, second) = (Rgb::from(first), Rgb::from(second));
    let texture = match section.pattern {
        PatternSetting::Checker => Texture::checkerboard(
            section.width,
            section.height,
            section.cells,
            first,
            second,
        )?,
        PatternSetting::Gradient => Texture::gradient(section.width, section.height, first, second)?,
    };
    Ok(texture.with_filter(map_filter(section.filter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_mappings_round_trip() {
        for mode in [BlinkMode::Sharp, BlinkMode::Smooth] {
            assert_eq!(map_blink_mode(blink_mode_setting(mode)), mode);
        }
        for mode in [BackgroundMode::WhiteFill, BackgroundMode::Textured] {
            assert_eq!(map_background_mode(background_mode_setting(mode)), mode);
        }
        for alpha in [OutputAlpha::Transparent, OutputAlpha::Opaque] {
            assert_eq!(map_alpha(alpha_setting(alpha)), alpha);
        }
    }

    #[test]
    fn tuning_keeps_unset_defaults() {
        let section = BlinkSection {
            speed: Some(2.0),
            ..BlinkSection::default()
        };
        let tuning = tuning_from_section(&section);
        assert_eq!(tuning.speed, 2.0);
        assert_eq!(tuning.sharp_amplitude, 32.0);
        assert_eq!(tuning.smooth_amplitude, 64.0);
        assert_eq!(tuning.floor, 1e-4);
    }

    #[test]
    fn builds_configured_texture() {
        let section = TextureSection {
            pattern: PatternSetting::Gradient,
            width: 4,
            height: 2,
            filter: FilterSetting::Nearest,
            ..TextureSection::default()
        };
        let texture = texture_from_section(&section).unwrap();
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(texture.filter(), TextureFilter::Nearest);
    }

    #[test]
    fn config_size_limit_matches_texture_limit() {
        assert_eq!(blinkconfig::MAX_TEXTURE_SIZE, Texture::MAX_DIMENSION);
        let section = TextureSection {
            width: blinkconfig::MAX_TEXTURE_SIZE + 1,
            height: 1,
            ..TextureSection::default()
        };
        assert!(matches!(
            texture_from_section(&section),
            Err(TextureError::TooLarge { .. })
        ));
    }
}
