use gridview_driver::{FrameClock, FrameObserver, SystemClock};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Samples kept per graph, one per frame (or per second for FPS and MB).
const HISTORY: usize = 74;
const FPS_WINDOW: Duration = Duration::from_secs(1);
const BYTES_PER_MB: f32 = 1024.0 * 1024.0;

/// Fixed-capacity history of durations, oldest first.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        if self.history.is_empty() {
            return Duration::ZERO;
        }
        self.history.iter().sum::<Duration>() / self.history.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.history.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn last(&self) -> Option<Duration> {
        self.history.back().copied()
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        self.history.iter().copied()
    }
}

/// Which readout the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPanel {
    /// Frames per second, sampled once per second.
    Fps,
    /// Milliseconds spent between frame begin and frame end.
    Ms,
    /// Resident memory of the process in megabytes, sampled once per second.
    #[default]
    Mb,
}

impl StatsPanel {
    pub fn next(self) -> Self {
        match self {
            StatsPanel::Fps => StatsPanel::Ms,
            StatsPanel::Ms => StatsPanel::Mb,
            StatsPanel::Mb => StatsPanel::Fps,
        }
    }

    fn unit(self) -> &'static str {
        match self {
            StatsPanel::Fps => "FPS",
            StatsPanel::Ms => "MS",
            StatsPanel::Mb => "MB",
        }
    }
}

/// Source of the process memory figure shown on the MB panel.
pub trait MemorySampler {
    /// Resident bytes, or `None` when the platform cannot report it.
    fn resident_bytes(&mut self) -> Option<u64>;
}

impl<F: FnMut() -> Option<u64>> MemorySampler for F {
    fn resident_bytes(&mut self) -> Option<u64> {
        self()
    }
}

/// Physical memory of the running process, read through `memory-stats`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemorySampler for ProcessMemory {
    fn resident_bytes(&mut self) -> Option<u64> {
        memory_stats::memory_stats().map(|usage| usage.physical_mem as u64)
    }
}

/// Per-frame timing fed by the renderer's begin/end notifications.
#[derive(Debug)]
pub struct FrameStats<C = SystemClock, M = ProcessMemory> {
    clock: C,
    memory: M,
    panel: StatsPanel,
    render_times: FrameTimer,
    fps_history: VecDeque<f32>,
    mb_history: VecDeque<f32>,
    begin: Option<Duration>,
    window_start: Option<Duration>,
    window_frames: u32,
    frames: u64,
}

impl FrameStats<SystemClock> {
    pub fn new(panel: StatsPanel) -> Self {
        Self::with_clock(SystemClock::new(), panel)
    }
}

impl<C: FrameClock> FrameStats<C> {
    pub fn with_clock(clock: C, panel: StatsPanel) -> Self {
        Self {
            clock,
            memory: ProcessMemory,
            panel,
            render_times: FrameTimer::new(HISTORY),
            fps_history: VecDeque::with_capacity(HISTORY),
            mb_history: VecDeque::with_capacity(HISTORY),
            begin: None,
            window_start: None,
            window_frames: 0,
            frames: 0,
        }
    }
}

fn push_sample(history: &mut VecDeque<f32>, value: f32) {
    if history.len() == HISTORY {
        history.pop_front();
    }
    history.push_back(value);
}

impl<C: FrameClock, M: MemorySampler> FrameStats<C, M> {
    /// Replace the memory source.
    pub fn with_memory<N: MemorySampler>(self, memory: N) -> FrameStats<C, N> {
        FrameStats {
            clock: self.clock,
            memory,
            panel: self.panel,
            render_times: self.render_times,
            fps_history: self.fps_history,
            mb_history: self.mb_history,
            begin: self.begin,
            window_start: self.window_start,
            window_frames: self.window_frames,
            frames: self.frames,
        }
    }

    pub fn panel(&self) -> StatsPanel {
        self.panel
    }

    pub fn set_panel(&mut self, panel: StatsPanel) {
        self.panel = panel;
    }

    /// Switch to the next panel, as a click on the overlay does.
    pub fn cycle_panel(&mut self) {
        self.panel = self.panel.next();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Most recent whole-second FPS sample, once one second has elapsed.
    pub fn fps(&self) -> Option<f32> {
        self.fps_history.back().copied()
    }

    /// Most recent memory sample in megabytes.
    pub fn memory_mb(&self) -> Option<f32> {
        self.mb_history.back().copied()
    }

    pub fn render_times(&self) -> &FrameTimer {
        &self.render_times
    }

    pub fn begin_at(&mut self, now: Duration) {
        self.begin = Some(now);
    }

    pub fn end_at(&mut self, now: Duration) {
        // An end without a begin is ignored rather than recorded as zero.
        let Some(begin) = self.begin.take() else {
            return;
        };
        self.frames += 1;
        self.render_times.record(now.saturating_sub(begin));

        // The first end opens the FPS window; frames are counted after it.
        let Some(start) = self.window_start else {
            self.open_window(now);
            return;
        };
        self.window_frames += 1;
        let elapsed = now.saturating_sub(start);
        if elapsed >= FPS_WINDOW {
            let fps = self.window_frames as f32 / elapsed.as_secs_f32();
            push_sample(&mut self.fps_history, fps);
            tracing::trace!(fps, "fps sample");
            self.open_window(now);
        }
    }

    fn open_window(&mut self, now: Duration) {
        self.window_start = Some(now);
        self.window_frames = 0;
        if let Some(bytes) = self.memory.resident_bytes() {
            push_sample(&mut self.mb_history, bytes as f32 / BYTES_PER_MB);
        }
    }

    /// Samples for the current panel's graph, oldest first.
    pub fn history(&self) -> Vec<f32> {
        match self.panel {
            StatsPanel::Fps => self.fps_history.iter().copied().collect(),
            StatsPanel::Ms => self
                .render_times
                .iter()
                .map(|d| d.as_secs_f32() * 1000.0)
                .collect(),
            StatsPanel::Mb => self.mb_history.iter().copied().collect(),
        }
    }

    /// One-line label: current value with the min-max over the history.
    pub fn readout(&self) -> String {
        let unit = self.panel.unit();
        if self.panel == StatsPanel::Ms {
            let Some(last) = self.render_times.last() else {
                return format!("-- {unit}");
            };
            let to_ms = |d: Duration| d.as_secs_f32() * 1000.0;
            return format!(
                "{:.1} {unit} ({:.1}-{:.1})",
                to_ms(last),
                to_ms(self.render_times.min()),
                to_ms(self.render_times.max())
            );
        }
        let samples = self.history();
        let Some(current) = samples.last().copied() else {
            return format!("-- {unit}");
        };
        let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        format!("{current:.0} {unit} ({min:.0}-{max:.0})")
    }
}

impl<C: FrameClock, M: MemorySampler> FrameObserver for FrameStats<C, M> {
    fn frame_begin(&mut self) {
        let now = self.clock.now();
        self.begin_at(now);
    }

    fn frame_end(&mut self) {
        let now = self.clock.now();
        self.end_at(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridview_driver::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), ms(20));
        assert_eq!(timer.max(), ms(30));
        assert_eq!(timer.min(), ms(10));
    }

    #[test]
    fn frame_timer_drops_oldest() {
        let mut timer = FrameTimer::new(2);
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), ms(25));
        assert_eq!(timer.iter().collect::<Vec<_>>(), vec![ms(20), ms(30)]);
        assert_eq!(timer.last(), Some(ms(30)));
    }

    #[test]
    fn render_time_is_begin_to_end() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Ms);
        stats.begin_at(ms(0));
        stats.end_at(ms(4));
        assert_eq!(stats.render_times().last(), Some(ms(4)));
        assert_eq!(stats.readout(), "4.0 MS (4.0-4.0)");
    }

    fn no_memory() -> Option<u64> {
        None
    }

    #[test]
    fn fps_sampled_after_one_second() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Fps)
            .with_memory(no_memory);
        assert_eq!(stats.readout(), "-- FPS");

        // 61 frame ends spaced 1/60 s apart: the first opens the window,
        // the next 60 fill one second.
        for i in 0..=60u64 {
            let t = Duration::from_micros(i * 16_667);
            stats.begin_at(t);
            stats.end_at(t + ms(2));
        }
        let fps = stats.fps().unwrap();
        assert!((fps - 60.0).abs() < 0.01, "fps {fps}");
        assert_eq!(stats.readout(), "60 FPS (60-60)");
    }

    #[test]
    fn no_fps_sample_before_window_closes() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Fps)
            .with_memory(no_memory);
        for i in 0..30u64 {
            let t = Duration::from_micros(i * 16_667);
            stats.begin_at(t);
            stats.end_at(t);
        }
        assert_eq!(stats.fps(), None);
    }

    #[test]
    fn memory_sampled_when_window_opens() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Mb)
            .with_memory(|| Some(64u64 * 1024 * 1024));
        assert_eq!(stats.readout(), "-- MB");

        stats.begin_at(ms(0));
        stats.end_at(ms(1));
        assert_eq!(stats.memory_mb(), Some(64.0));
        assert_eq!(stats.history(), vec![64.0]);
        assert_eq!(stats.readout(), "64 MB (64-64)");
    }

    #[test]
    fn memory_history_grows_once_per_second() {
        let mut bytes: u64 = 10 * 1024 * 1024;
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Mb).with_memory(
            move || {
                bytes += 1024 * 1024;
                Some(bytes)
            },
        );
        for i in 0..=120u64 {
            let t = Duration::from_micros(i * 16_667);
            stats.begin_at(t);
            stats.end_at(t);
        }
        assert_eq!(stats.history(), vec![11.0, 12.0, 13.0]);
        assert_eq!(stats.readout(), "13 MB (11-13)");
    }

    #[test]
    fn unavailable_memory_leaves_panel_empty() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Mb)
            .with_memory(no_memory);
        stats.begin_at(ms(0));
        stats.end_at(ms(1));
        assert_eq!(stats.memory_mb(), None);
        assert_eq!(stats.readout(), "-- MB");
    }

    #[test]
    fn ms_readout_spans_render_times() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Ms)
            .with_memory(no_memory);
        for (begin, end) in [(0, 3), (20, 25), (40, 44)] {
            stats.begin_at(ms(begin));
            stats.end_at(ms(end));
        }
        assert_eq!(stats.readout(), "4.0 MS (3.0-5.0)");
        assert_eq!(stats.render_times().average(), ms(4));
    }

    #[test]
    fn default_panel_is_memory() {
        assert_eq!(StatsPanel::default(), StatsPanel::Mb);
    }

    #[test]
    fn end_without_begin_is_ignored() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Ms);
        stats.end_at(ms(5));
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.render_times().count(), 0);
    }

    #[test]
    fn observer_uses_clock() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Ms);
        stats.frame_begin();
        stats.clock_mut().advance(ms(7));
        stats.frame_end();
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.render_times().last(), Some(ms(7)));
    }

    #[test]
    fn panel_cycles() {
        let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Fps);
        stats.cycle_panel();
        assert_eq!(stats.panel(), StatsPanel::Ms);
        stats.cycle_panel();
        assert_eq!(stats.panel(), StatsPanel::Mb);
        stats.cycle_panel();
        assert_eq!(stats.panel(), StatsPanel::Fps);
    }
}
