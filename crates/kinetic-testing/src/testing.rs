use std::cell::Cell;
use std::rc::Rc;

use kinetic_core::{FrameClock, FrameScheduler};

/// Nominal frame interval of the test driver (60 Hz).
pub const FRAME_NANOS: u64 = 16_666_667;

/// Initializes `env_logger` for a test binary. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scheduler that counts frame requests instead of rendering.
#[derive(Debug, Default)]
pub struct TestScheduler {
    requests: Cell<usize>,
}

impl TestScheduler {
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl FrameScheduler for TestScheduler {
    fn schedule_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Headless frame driver.
///
/// Owns a [`FrameClock`] and a virtual timeline. Each advanced frame moves
/// the timeline forward and drains the clock's callbacks at the new time.
pub struct FrameDriver {
    clock: FrameClock,
    scheduler: Rc<TestScheduler>,
    now_nanos: Cell<u64>,
    frames: Cell<usize>,
}

impl FrameDriver {
    pub fn new() -> Self {
        let scheduler = Rc::new(TestScheduler::default());
        Self {
            clock: FrameClock::new(scheduler.clone()),
            scheduler,
            now_nanos: Cell::new(0),
            frames: Cell::new(0),
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn now_nanos(&self) -> u64 {
        self.now_nanos.get()
    }

    /// Frames drained so far.
    pub fn frames(&self) -> usize {
        self.frames.get()
    }

    pub fn frame_requests(&self) -> usize {
        self.scheduler.requests()
    }

    pub fn is_idle(&self) -> bool {
        !self.clock.has_frame_callbacks()
    }

    /// Advances the timeline by `nanos` and drains one frame.
    pub fn advance_by(&self, nanos: u64) {
        let now = self.now_nanos.get() + nanos;
        self.now_nanos.set(now);
        self.frames.set(self.frames.get() + 1);
        self.clock.drain_frame_callbacks(now);
    }

    /// Advances by one nominal frame interval.
    pub fn advance_frame(&self) {
        self.advance_by(FRAME_NANOS);
    }

    /// Drains frames until no callbacks remain. Returns the number of frames
    /// it took.
    ///
    /// Panics after `max_frames` frames so that a simulation that never
    /// settles fails the test instead of hanging it.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while !self.is_idle() {
            if frames == max_frames {
                panic!("run_until_idle: still busy after {max_frames} frames");
            }
            self.advance_frame();
            frames += 1;
        }
        log::trace!("frame driver idle after {frames} frames");
        frames
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
