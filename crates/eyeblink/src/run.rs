use std::fmt::Write as _;
use std::time::Instant;

use anyhow::{Context, Result};
use blink::{
    luminance, normalize, render_frame, render_intensity, time_source_for_policy, vignette,
    BlinkEffect, FrameBuffer, FrameContext, FrameStats, PixelCoord, RenderPolicy, Resolution,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::ResolvedEffect;
use crate::cli::{PreviewArgs, SampleArgs, StatsArgs, WaveArgs};

/// Characters from darkest to brightest for the text preview.
const SHADE_RAMP: &[u8] = b" .:-=+*#%@";

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Serialize)]
struct SampleReport {
    blink_mode: String,
    background: String,
    resolution: [f32; 2],
    pixel: [f32; 2],
    time: f32,
    uv: [f32; 2],
    vignette: f32,
    wave: f32,
    intensity: f32,
    color: [f32; 4],
}

pub fn run_sample(resolved: &ResolvedEffect, args: SampleArgs) -> Result<()> {
    let effect = BlinkEffect::new(resolved.settings.clone());
    let resolution = Resolution::from(args.size);
    let pixel = PixelCoord::new(args.pixel.0, args.pixel.1);
    let time = args.time.unwrap_or(resolved.still_time);

    let intensity = effect
        .evaluator()
        .try_evaluate(pixel, resolution, time)
        .context("failed to evaluate blink intensity")?;
    let uv = normalize(pixel, resolution);
    let color = effect.shade(&FrameContext::new(resolution, time, pixel));

    let report = SampleReport {
        blink_mode: effect.blink_mode().to_string(),
        background: effect.background().mode().to_string(),
        resolution: [resolution.width, resolution.height],
        pixel: [pixel.x, pixel.y],
        time,
        uv: [uv.u, uv.v],
        vignette: vignette(uv),
        wave: effect.evaluator().frame_wave(time),
        intensity,
        color: [color.r, color.g, color.b, color.a],
    };

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("failed to encode sample")?;
        println!("{text}");
    } else {
        println!("mode:       {} / {}", report.blink_mode, report.background);
        println!("uv:         ({:.6}, {:.6})", uv.u, uv.v);
        println!("vignette:   {:.6}", report.vignette);
        println!("wave:       {:.6}", report.wave);
        println!("intensity:  {:.6}", report.intensity);
        println!(
            "color:      ({:.6}, {:.6}, {:.6}, {:.1})",
            color.r, color.g, color.b, color.a
        );
    }
    Ok(())
}

pub fn run_wave(resolved: &ResolvedEffect, args: WaveArgs) -> Result<()> {
    let effect = BlinkEffect::new(resolved.settings.clone());
    let evaluator = effect.evaluator();
    let last = (args.steps - 1) as f32;
    println!("{:>12}  {:>12}  {}", "time", "wave", evaluator.wave_name());
    for step in 0..args.steps {
        let t = args.from + (args.to - args.from) * step as f32 / last;
        println!("{t:>12.6}  {:>12.6}", evaluator.frame_wave(t));
    }
    Ok(())
}

pub fn run_preview(resolved: &ResolvedEffect, args: PreviewArgs) -> Result<()> {
    let effect = BlinkEffect::new(resolved.settings.clone());
    let start = args.time.unwrap_or(resolved.still_time);
    let policy = if args.frames > 1 {
        RenderPolicy::Animate {
            start,
            fps: args.fps.unwrap_or(resolved.fps),
            frames: args.frames,
        }
    } else {
        RenderPolicy::Still { time: start }
    };
    let mut source = time_source_for_policy(&policy).context("invalid preview timing")?;
    let (width, height) = args.size;

    for _ in 0..policy.frame_count() {
        let sample = source.sample();
        let frame = render_frame(&effect, width, height, sample.seconds)?;
        if policy.frame_count() > 1 {
            println!("frame {} t={:.4}", sample.frame_index, sample.seconds);
        }
        print!("{}", text_preview(&frame));
    }
    Ok(())
}

pub fn run_stats(resolved: &ResolvedEffect, args: StatsArgs) -> Result<()> {
    let effect = BlinkEffect::new(resolved.settings.clone());
    let time = args.time.unwrap_or(resolved.still_time);
    let (width, height) = args.size;

    let started = Instant::now();
    let field = render_intensity(effect.evaluator(), width, height, time)?;
    let elapsed = started.elapsed();
    let stats = FrameStats::from_intensity(&field).context("frame produced no samples")?;

    println!("size:     {width}x{height}");
    println!("time:     {time:.6}");
    println!("wave:     {:.6}", effect.evaluator().frame_wave(time));
    println!("min:      {:.6}", stats.min);
    println!("max:      {:.6}", stats.max);
    println!("mean:     {:.6}", stats.mean);
    println!("render:   {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    tracing::debug!(samples = stats.samples, "frame statistics computed");
    Ok(())
}

pub fn run_config(resolved: &ResolvedEffect) -> Result<()> {
    let text = resolved
        .effective
        .to_toml_string()
        .context("failed to serialize resolved config")?;
    if let Some(path) = &resolved.config_path {
        println!("# loaded from {}", path.display());
    }
    print!("{text}");
    Ok(())
}

/// Renders a frame as lines of shade characters, top row first.
pub fn text_preview(frame: &FrameBuffer) -> String {
    let mut out = String::with_capacity((frame.width() as usize + 1) * frame.height() as usize);
    let levels = (SHADE_RAMP.len() - 1) as f32;
    for row in frame.pixels().chunks(frame.width() as usize) {
        for color in row {
            let index = (luminance(*color).clamp(0.0, 1.0) * levels).round() as usize;
            out.push(SHADE_RAMP[index] as char);
        }
        let _ = writeln!(out);
    }
    out
}
