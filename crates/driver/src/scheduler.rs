/// Asks the host to run the driver again when the display can take a frame.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

impl<F: FnMut()> FrameScheduler for F {
    fn request_frame(&mut self) {
        self()
    }
}

/// Scheduler that records requests instead of acting on them.
///
/// Headless runs poll `take_request` to decide whether to step again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler {
    requests: u64,
    pending: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames requested so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Consume the outstanding request, if any.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
        self.pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_counts_and_consumes() {
        let mut s = ManualScheduler::new();
        assert!(!s.take_request());
        s.request_frame();
        s.request_frame();
        assert_eq!(s.requests(), 2);
        assert!(s.take_request());
        assert!(!s.take_request());
    }

    #[test]
    fn closures_schedule() {
        let mut calls = 0;
        {
            let mut s = || calls += 1;
            s.request_frame();
            s.request_frame();
        }
        assert_eq!(calls, 2);
    }
}
