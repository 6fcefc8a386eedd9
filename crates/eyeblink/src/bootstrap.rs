use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use blink::{BackgroundMode, BlinkMode, EffectSettings, OutputAlpha};
use blinkconfig::{BlinkSection, EffectFile};

use crate::bindings::{
    alpha_setting, background_mode_setting, blink_mode_setting, map_alpha, map_background_mode,
    map_blink_mode, texture_from_section, tuning_from_section,
};
use crate::cli::EffectArgs;

/// Fallback frame rate for animated previews.
pub const DEFAULT_FPS: f32 = 30.0;

/// Effect settings after layering build defaults, the config file, and CLI flags.
#[derive(Debug, Clone)]
pub struct ResolvedEffect {
    pub settings: EffectSettings,
    /// Fully populated view of the resolved values, printable as TOML.
    pub effective: EffectFile,
    pub still_time: f32,
    pub fps: f32,
    pub config_path: Option<PathBuf>,
}

pub fn resolve_effect(args: &EffectArgs) -> Result<ResolvedEffect> {
    let file = match &args.config {
        Some(path) => {
            let file = EffectFile::load(path)
                .with_context(|| format!("failed to load effect config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded effect config");
            file
        }
        None => EffectFile::default(),
    };

    let blink_mode = args
        .blink
        .or(file.blink.mode)
        .map(map_blink_mode)
        .unwrap_or_default();
    let background_mode = args
        .background
        .or(file.background.mode)
        .map(map_background_mode)
        .unwrap_or_default();
    let alpha = if args.opaque {
        OutputAlpha::Opaque
    } else {
        file.output.alpha.map(map_alpha).unwrap_or_default()
    };
    let tuning = tuning_from_section(&file.blink);

    let texture = match (background_mode, &file.background.texture) {
        (BackgroundMode::Textured, Some(section)) => {
            Some(texture_from_section(section).context("failed to build background texture")?)
        }
        (BackgroundMode::Textured, None) => Some(
            texture_from_section(&Default::default())
                .context("failed to build default background texture")?,
        ),
        (BackgroundMode::WhiteFill, _) => None,
    };

    let still_time = file.still_time_secs().unwrap_or(0.0);
    let fps = match file.playback.fps {
        Some(fps) if fps > 0.0 => fps,
        _ => DEFAULT_FPS,
    };

    let effective = effective_file(&file, blink_mode, background_mode, alpha, still_time, fps);

    tracing::info!(
        blink = %blink_mode,
        background = %background_mode,
        ?alpha,
        config = ?args.config,
        "resolved effect settings"
    );

    Ok(ResolvedEffect {
        settings: EffectSettings {
            blink_mode,
            background_mode,
            texture,
            tuning,
            alpha,
        },
        effective,
        still_time,
        fps,
        config_path: args.config.clone(),
    })
}

fn effective_file(
    file: &EffectFile,
    blink_mode: BlinkMode,
    background_mode: BackgroundMode,
    alpha: OutputAlpha,
    still_time: f32,
    fps: f32,
) -> EffectFile {
    let tuning = tuning_from_section(&file.blink);
    let mut effective = file.clone();
    effective.blink = BlinkSection {
        mode: Some(blink_mode_setting(blink_mode)),
        speed: Some(tuning.speed),
        sharp_amplitude: Some(tuning.sharp_amplitude),
        smooth_amplitude: Some(tuning.smooth_amplitude),
        wave_floor: Some(tuning.floor),
    };
    effective.background.mode = Some(background_mode_setting(background_mode));
    if background_mode == BackgroundMode::Textured && effective.background.texture.is_none() {
        effective.background.texture = Some(Default::default());
    }
    effective.output.alpha = Some(alpha_setting(alpha));
    effective.playback.still_time = Some(Duration::from_secs_f32(still_time.max(0.0)));
    effective.playback.fps = Some(fps);
    effective
}
