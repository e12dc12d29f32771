//! Host integration hooks.
//!
//! The host owns the render loop. The frame clock calls back into the host
//! through [`FrameScheduler`] whenever it has callbacks waiting for a frame;
//! the host answers by calling
//! [`FrameClock::drain_frame_callbacks`](crate::FrameClock::drain_frame_callbacks)
//! on its next frame.

/// Requests frames from the host.
pub trait FrameScheduler {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler for hosts that drive frames unconditionally.
#[derive(Debug, Default)]
pub struct DefaultScheduler;

impl FrameScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
