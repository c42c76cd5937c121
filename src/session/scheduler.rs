use std::time::{Duration, Instant};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::PanoglobeResult;
use crate::session::pipeline::Pipeline;

/// How frame deadlines relate to the wall clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Render back to back. `dt` is still the nominal frame duration, so output is deterministic.
    #[default]
    Unpaced,
    /// Sleep until each frame's deadline.
    RealTime,
}

#[derive(Clone, Debug)]
pub struct SchedulerOpts {
    pub fps: Fps,
    pub pacing: Pacing,
    /// Stop after this many frames.
    pub max_frames: u64,
}

impl Default for SchedulerOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            pacing: Pacing::Unpaced,
            max_frames: 60,
        }
    }
}

/// Run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    /// Seconds of animation time simulated.
    pub sim_secs: f64,
    /// Frames that finished after their deadline (real-time pacing only).
    pub late_frames: u64,
}

/// Fixed-rate driver that renders pipeline frames and hands them to a sink.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    opts: SchedulerOpts,
}

impl FrameScheduler {
    pub fn new(opts: SchedulerOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &SchedulerOpts {
        &self.opts
    }

    pub fn run(
        &self,
        pipeline: &mut Pipeline,
        sink: &mut dyn FrameSink,
    ) -> PanoglobeResult<RunStats> {
        self.run_with(pipeline, sink, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `before_frame` ahead of every frame so callers can queue
    /// scripted input.
    ///
    /// Stops when the frame budget is exhausted; a render or sink error ends the run immediately
    /// and `end` is not called.
    #[tracing::instrument(
        skip_all,
        fields(max_frames = self.opts.max_frames, fps = self.opts.fps.as_f64())
    )]
    pub fn run_with<F>(
        &self,
        pipeline: &mut Pipeline,
        sink: &mut dyn FrameSink,
        mut before_frame: F,
    ) -> PanoglobeResult<RunStats>
    where
        F: FnMut(FrameIndex, &Pipeline),
    {
        let fps = Fps::new(self.opts.fps.num, self.opts.fps.den)?;
        let dt = fps.frame_duration_secs();
        let vp = pipeline.viewport();
        sink.begin(SinkConfig {
            width: vp.width,
            height: vp.height,
            fps,
        })?;

        let start = Instant::now();
        let mut stats = RunStats::default();
        for n in 0..self.opts.max_frames {
            let idx = pipeline.clock().frame();
            before_frame(idx, &*pipeline);
            let frame = pipeline.render_frame(dt)?;
            sink.push_frame(idx, frame)?;
            stats.frames += 1;
            stats.sim_secs += dt;

            if self.opts.pacing == Pacing::RealTime {
                let deadline = start + Duration::from_secs_f64(fps.frames_to_secs(n + 1));
                let now = Instant::now();
                if now < deadline {
                    std::thread::sleep(deadline - now);
                } else {
                    stats.late_frames += 1;
                }
            }
        }
        sink.end()?;

        tracing::info!(frames = stats.frames, late = stats.late_frames, "run finished");
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
