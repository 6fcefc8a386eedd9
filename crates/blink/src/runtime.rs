/// How the host advances time between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Evaluate a single frame at a fixed timestamp.
    Still {
        /// Seconds to evaluate the effect at.
        time: f32,
    },
    /// Step through `frames` frames at a fixed rate.
    Animate {
        /// Timestamp of the first frame in seconds.
        start: f32,
        /// Frames per second; each frame advances time by `1 / fps`.
        fps: f32,
        /// Number of frames to produce.
        frames: u32,
    },
}

impl RenderPolicy {
    /// Number of frames the policy asks for.
    pub fn frame_count(&self) -> u32 {
        match self {
            RenderPolicy::Still { .. } => 1,
            RenderPolicy::Animate { frames, .. } => *frames,
        }
    }
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Still { time: 0.0 }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PolicyError {
    #[error("time must be finite (got {0})")]
    NonFiniteTime(f32),
    #[error("fps must be finite and greater than zero (got {0})")]
    InvalidFps(f32),
}

/// Snapshot of the time fed to the effect for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where frame times originate from.
pub trait TimeSource: Send {
    /// Rewinds the source to its first frame.
    fn reset(&mut self);
    /// Produces the time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source that always reports the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Deterministic clock advancing `1 / fps` seconds per frame.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    start: f32,
    fps: f32,
    frame: u64,
}

impl SteppedTimeSource {
    pub fn new(start: f32, fps: f32) -> Self {
        Self {
            start,
            fps,
            frame: 0,
        }
    }
}

impl TimeSource for SteppedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        // Computed from the frame index, never accumulated.
        let seconds = self.start + (self.frame as f64 / self.fps as f64) as f32;
        let sample = TimeSample::new(seconds, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> Result<BoxedTimeSource, PolicyError> {
    match *policy {
        RenderPolicy::Still { time } => {
            if !time.is_finite() {
                return Err(PolicyError::NonFiniteTime(time));
            }
            Ok(Box::new(FixedTimeSource::new(time)))
        }
        RenderPolicy::Animate { start, fps, .. } => {
            if !start.is_finite() {
                return Err(PolicyError::NonFiniteTime(start));
            }
            if !fps.is_finite() || fps <= 0.0 {
                return Err(PolicyError::InvalidFps(fps));
            }
            Ok(Box::new(SteppedTimeSource::new(start, fps)))
        }
    }
}
