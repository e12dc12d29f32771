//! Single-threaded frame callback queue.
//!
//! Callbacks registered with [`FrameClock::with_frame_nanos`] run once, on
//! the next call to [`FrameClock::drain_frame_callbacks`]. Callbacks
//! registered while a frame is being drained wait for the following frame.
//! Cancelling a callback that has not run yet skips it, even when the cancel
//! happens inside another callback of the same frame.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::platform::{DefaultScheduler, FrameScheduler};

pub(crate) type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct FrameClockInner {
    scheduler: Rc<dyn FrameScheduler>,
    callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    // Callbacks of the frame being drained that have not run yet.
    draining: RefCell<VecDeque<FrameCallbackEntry>>,
    next_callback_id: Cell<FrameCallbackId>,
    frame_time_nanos: Cell<Option<u64>>,
}

impl FrameClockInner {
    fn register(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);
        self.callbacks.borrow_mut().push_back(FrameCallbackEntry {
            id,
            callback: Some(callback),
        });
        self.scheduler.schedule_frame();
        id
    }

    fn cancel(&self, id: FrameCallbackId) {
        for queue in [&self.callbacks, &self.draining] {
            let mut queue = queue.borrow_mut();
            if let Some(index) = queue.iter().position(|entry| entry.id == id) {
                queue.remove(index);
                return;
            }
        }
    }

    fn drain(&self, frame_time_nanos: u64) {
        self.frame_time_nanos.set(Some(frame_time_nanos));
        let frame = std::mem::take(&mut *self.callbacks.borrow_mut());
        self.draining.borrow_mut().extend(frame);
        loop {
            let next = self.draining.borrow_mut().pop_front();
            let Some(mut entry) = next else {
                break;
            };
            if let Some(callback) = entry.callback.take() {
                callback(frame_time_nanos);
            }
        }
    }
}

/// Queue of one-shot callbacks driven by the host's frames.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<FrameClockInner>,
}

impl FrameClock {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(FrameClockInner {
                scheduler,
                callbacks: RefCell::new(VecDeque::new()),
                draining: RefCell::new(VecDeque::new()),
                next_callback_id: Cell::new(1),
                frame_time_nanos: Cell::new(None),
            }),
        }
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.inner.register(Box::new(callback));
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }

    /// Runs every callback registered before this call with `frame_time_nanos`.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain(frame_time_nanos);
    }

    pub fn has_frame_callbacks(&self) -> bool {
        !self.inner.callbacks.borrow().is_empty()
    }

    pub fn pending_callbacks(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }

    /// Time of the most recently drained frame.
    pub fn frame_time_nanos(&self) -> Option<u64> {
        self.inner.frame_time_nanos.get()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Rc::new(DefaultScheduler))
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("pending", &self.pending_callbacks())
            .field("frame_time_nanos", &self.frame_time_nanos())
            .finish()
    }
}

/// Handle to a pending frame callback; dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    clock: Weak<FrameClockInner>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn cancel(mut self) {
        self.cancel_in_place();
    }

    fn cancel_in_place(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(clock) = self.clock.upgrade() {
                clock.cancel(id);
            }
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.cancel_in_place();
    }
}

#[cfg(test)]
#[path = "tests/frame_clock_tests.rs"]
mod tests;
