use std::path::PathBuf;

use blinkconfig::{BackgroundModeSetting, BlinkModeSetting};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "eyeblink",
    author,
    version,
    about = "Eye-blink vignette diagnostics",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub effect: EffectArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of the build defaults and the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct EffectArgs {
    /// Effect configuration TOML file.
    #[arg(long, global = true, env = "EYEBLINK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Blink wave shape: `sharp` or `smooth`.
    #[arg(long, global = true, value_name = "MODE", value_parser = parse_blink)]
    pub blink: Option<BlinkModeSetting>,

    /// Background source: `white` or `textured`.
    #[arg(long, global = true, value_name = "MODE", value_parser = parse_background)]
    pub background: Option<BackgroundModeSetting>,

    /// Write alpha = 1 instead of the default transparent output.
    #[arg(long, global = true)]
    pub opaque: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a single pixel and print every intermediate value.
    Sample(SampleArgs),
    /// Tabulate the blink wave over a time range.
    Wave(WaveArgs),
    /// Print a text-mode luminance preview of one or more frames.
    Preview(PreviewArgs),
    /// Render a full frame and report intensity statistics.
    Stats(StatsArgs),
    /// Print the resolved effect configuration as TOML.
    Config,
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Frame resolution (e.g. `1920x1080`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: (u32, u32),

    /// Pixel position in device pixels, origin bottom-left (e.g. `960,540`).
    #[arg(long, value_name = "X,Y", value_parser = parse_pixel)]
    pub pixel: (f32, f32),

    /// Time in seconds; defaults to the configured still time.
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub time: Option<f32>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WaveArgs {
    /// First timestamp in seconds.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub from: f32,

    /// Last timestamp in seconds.
    #[arg(long, default_value_t = std::f32::consts::PI, allow_negative_numbers = true)]
    pub to: f32,

    /// Number of samples between `--from` and `--to` inclusive.
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(2..))]
    pub steps: u32,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Preview size in characters.
    #[arg(long, value_name = "COLSxROWS", value_parser = parse_size, default_value = "64x24")]
    pub size: (u32, u32),

    /// Time of the first frame in seconds.
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub time: Option<f32>,

    /// Number of frames to print; more than one steps time at `--fps`.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub frames: u32,

    /// Frame rate used when printing several frames.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Frame resolution (e.g. `1920x1080`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "1920x1080")]
    pub size: (u32, u32),

    /// Time in seconds; defaults to the configured still time.
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub time: Option<f32>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_blink(value: &str) -> Result<BlinkModeSetting, String> {
    if value.trim().is_empty() {
        return Err("blink mode must not be empty".to_string());
    }
    blinkconfig::parse_blink_mode(value)
}

pub fn parse_background(value: &str) -> Result<BackgroundModeSetting, String> {
    if value.trim().is_empty() {
        return Err("background mode must not be empty".to_string());
    }
    blinkconfig::parse_background_mode(value)
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_pixel(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .trim()
        .split_once(',')
        .ok_or_else(|| "expected X,Y".to_string())?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|_| "invalid horizontal pixel coordinate".to_string())?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|_| "invalid vertical pixel coordinate".to_string())?;
    if !x.is_finite() || !y.is_finite() {
        return Err("pixel coordinates must be finite".into());
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_size(" 64 X 24 ").unwrap(), (64, 24));
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("1920").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn parses_pixels() {
        assert_eq!(parse_pixel("960,540").unwrap(), (960.0, 540.0));
        assert_eq!(parse_pixel("0.5, 10.25").unwrap(), (0.5, 10.25));
        assert!(parse_pixel("960").is_err());
        assert!(parse_pixel("inf,1").is_err());
    }

    #[test]
    fn parses_modes() {
        assert_eq!(parse_blink("smooth").unwrap(), BlinkModeSetting::Smooth);
        assert!(parse_blink("  ").is_err());
        assert_eq!(
            parse_background("textured").unwrap(),
            BackgroundModeSetting::Textured
        );
        assert!(parse_background("video").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "eyeblink",
            "stats",
            "--size",
            "32x16",
            "--blink",
            "smooth",
            "--opaque",
        ])
        .unwrap();
        assert_eq!(cli.effect.blink, Some(BlinkModeSetting::Smooth));
        assert!(cli.effect.opaque);
        match cli.command {
            Command::Stats(args) => assert_eq!(args.size, (32, 16)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
