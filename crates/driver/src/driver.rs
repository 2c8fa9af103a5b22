use crate::clock::FrameClock;
use crate::scheduler::FrameScheduler;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The work done once per frame.
pub trait FrameTarget {
    type Error: std::error::Error + 'static;

    /// Advance animated state by `delta` seconds.
    fn update(&mut self, delta: f32);

    /// Draw the current state.
    fn render(&mut self) -> Result<(), Self::Error>;
}

/// Notified immediately before and after each render.
pub trait FrameObserver {
    fn frame_begin(&mut self);
    fn frame_end(&mut self);
}

impl FrameObserver for () {
    fn frame_begin(&mut self) {}
    fn frame_end(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Upper bound on a single frame's delta. Stalls (debugger, window drag)
    /// are reported as one frame of this length.
    pub max_delta: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_delta: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    Rendered { frame: u64, delta: f32 },
    Stopped,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError<E: std::error::Error + 'static> {
    #[error("render failed on frame {frame}")]
    Render {
        frame: u64,
        #[source]
        source: E,
    },
}

/// Runs `update` + `render` once per scheduled frame until stopped.
pub struct AnimationDriver<S, C> {
    scheduler: S,
    clock: C,
    config: DriverConfig,
    running: bool,
    last_frame: Option<Duration>,
    frames: u64,
    last_delta: f32,
}

impl<S: FrameScheduler, C: FrameClock> AnimationDriver<S, C> {
    /// A driver in the running state. Call `start` to request the first frame.
    pub fn new(scheduler: S, clock: C, config: DriverConfig) -> Self {
        Self {
            scheduler,
            clock,
            config,
            running: true,
            last_frame: None,
            frames: 0,
            last_delta: 0.0,
        }
    }

    /// Enter the running state and ask for the first frame. The next step
    /// measures a zero delta.
    pub fn start(&mut self) {
        self.running = true;
        self.last_frame = None;
        self.scheduler.request_frame();
        tracing::info!("animation driver started");
    }

    /// Stop scheduling. Steps after this return `FrameOutcome::Stopped`.
    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(frames = self.frames, "animation driver stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames rendered successfully.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Delta in seconds handed to the last update.
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn measure_delta(&mut self) -> Duration {
        let now = self.clock.now();
        let delta = match self.last_frame {
            Some(prev) => now.saturating_sub(prev),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        delta.min(self.config.max_delta)
    }

    /// Run one frame: schedule the next, measure time, update, render.
    ///
    /// A render error stops the driver and is returned unchanged in
    /// `DriverError::Render`.
    pub fn step<T: FrameTarget>(
        &mut self,
        target: &mut T,
        observer: &mut dyn FrameObserver,
    ) -> Result<FrameOutcome, DriverError<T::Error>> {
        if !self.running {
            return Ok(FrameOutcome::Stopped);
        }
        let _span = tracing::trace_span!("frame", n = self.frames).entered();

        self.scheduler.request_frame();
        let delta = self.measure_delta().as_secs_f32();
        target.update(delta);

        observer.frame_begin();
        let rendered = target.render();
        observer.frame_end();

        if let Err(source) = rendered {
            self.running = false;
            tracing::error!(frame = self.frames, "render failed, animation driver stopped");
            return Err(DriverError::Render {
                frame: self.frames,
                source,
            });
        }

        self.frames += 1;
        self.last_delta = delta;
        Ok(FrameOutcome::Rendered {
            frame: self.frames,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::scheduler::ManualScheduler;

    #[derive(Debug, thiserror::Error)]
    #[error("device lost")]
    struct DeviceLost;

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<f32>,
        renders: usize,
        fail_on: Option<usize>,
        log: Vec<&'static str>,
    }

    impl FrameTarget for Recorder {
        type Error = DeviceLost;

        fn update(&mut self, delta: f32) {
            self.deltas.push(delta);
            self.log.push("update");
        }

        fn render(&mut self) -> Result<(), DeviceLost> {
            self.renders += 1;
            self.log.push("render");
            if self.fail_on == Some(self.renders) {
                return Err(DeviceLost);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Hooks {
        calls: Vec<&'static str>,
    }

    impl FrameObserver for Hooks {
        fn frame_begin(&mut self) {
            self.calls.push("begin");
        }
        fn frame_end(&mut self) {
            self.calls.push("end");
        }
    }

    fn driver() -> AnimationDriver<ManualScheduler, ManualClock> {
        AnimationDriver::new(ManualScheduler::new(), ManualClock::new(), DriverConfig::default())
    }

    #[test]
    fn first_delta_is_zero_then_measured() {
        let mut d = driver();
        let mut target = Recorder::default();
        d.start();
        d.step(&mut target, &mut ()).unwrap();
        d.clock_mut().advance(Duration::from_millis(16));
        d.step(&mut target, &mut ()).unwrap();

        assert_eq!(target.deltas[0], 0.0);
        assert!((target.deltas[1] - 0.016).abs() < 1e-6);
        assert_eq!(d.frames(), 2);
    }

    #[test]
    fn each_step_requests_next_frame() {
        let mut d = driver();
        let mut target = Recorder::default();
        d.start();
        for _ in 0..5 {
            assert!(d.scheduler_mut().take_request());
            d.step(&mut target, &mut ()).unwrap();
        }
        assert_eq!(d.scheduler().requests(), 6);
    }

    #[test]
    fn stop_prevents_rescheduling() {
        let mut d = driver();
        let mut target = Recorder::default();
        d.start();
        d.step(&mut target, &mut ()).unwrap();
        d.stop();
        let requests = d.scheduler().requests();

        assert_eq!(d.step(&mut target, &mut ()).unwrap(), FrameOutcome::Stopped);
        assert_eq!(d.scheduler().requests(), requests);
        assert_eq!(target.renders, 1);
        assert!(!d.is_running());
    }

    #[test]
    fn clock_going_backwards_gives_zero_delta() {
        let mut d = driver();
        let mut target = Recorder::default();
        d.clock_mut().set(Duration::from_secs(5));
        d.step(&mut target, &mut ()).unwrap();
        d.clock_mut().set(Duration::from_secs(4));
        d.step(&mut target, &mut ()).unwrap();
        assert_eq!(target.deltas, vec![0.0, 0.0]);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut d = driver();
        let mut target = Recorder::default();
        d.step(&mut target, &mut ()).unwrap();
        d.clock_mut().advance(Duration::from_secs(3));
        match d.step(&mut target, &mut ()).unwrap() {
            FrameOutcome::Rendered { frame, delta } => {
                assert_eq!(frame, 2);
                assert!((delta - 0.1).abs() < 1e-6);
            }
            FrameOutcome::Stopped => panic!("driver stopped unexpectedly"),
        }
    }

    #[test]
    fn observer_brackets_render() {
        let mut d = driver();
        let mut target = Recorder::default();
        let mut hooks = Hooks::default();
        d.step(&mut target, &mut hooks).unwrap();
        d.step(&mut target, &mut hooks).unwrap();
        assert_eq!(hooks.calls, vec!["begin", "end", "begin", "end"]);
        assert_eq!(target.log, vec!["update", "render", "update", "render"]);
    }

    #[test]
    fn render_error_stops_driver() {
        let mut d = driver();
        let mut target = Recorder {
            fail_on: Some(2),
            ..Recorder::default()
        };
        let mut hooks = Hooks::default();
        d.step(&mut target, &mut hooks).unwrap();
        let err = d.step(&mut target, &mut hooks).unwrap_err();
        assert!(matches!(err, DriverError::Render { frame: 1, .. }));
        assert!(!d.is_running());
        assert_eq!(d.frames(), 1);
        // begin/end stay paired even when the render fails
        assert_eq!(hooks.calls.len(), 4);
        assert_eq!(d.step(&mut target, &mut hooks).unwrap(), FrameOutcome::Stopped);
    }
}
