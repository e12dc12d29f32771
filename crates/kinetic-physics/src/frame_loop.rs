//! Frame-driven sources.
//!
//! Springs and tweens share one loop: report `Active` when a run starts,
//! step once per frame and deliver the value, report `AtRest` once the
//! source settles. A run that is stopped mid-flight reports nothing.

use std::cell::RefCell;
use std::rc::Rc;

use kinetic_core::{FrameCallbackRegistration, FrameClock, MotionState, Observer};

/// Scheduling state owned by a [`FrameDriven`] source.
pub(crate) struct FrameLoop<T> {
    clock: FrameClock,
    observer: Observer<T>,
    running: bool,
    registration: Option<FrameCallbackRegistration>,
}

impl<T> FrameLoop<T> {
    pub(crate) fn new(clock: FrameClock, observer: Observer<T>) -> Self {
        Self {
            clock,
            observer,
            running: false,
            registration: None,
        }
    }
}

pub(crate) trait FrameDriven: 'static {
    type Value: 'static;

    /// Used in log lines.
    const NAME: &'static str;

    fn frame_loop(&mut self) -> &mut FrameLoop<Self::Value>;

    fn is_settled(&self) -> bool;

    /// Called as a run begins.
    fn on_start(&mut self) {}

    /// Advances to `frame_time_nanos`. `None` skips delivery for this frame.
    fn step(&mut self, frame_time_nanos: u64) -> Option<Self::Value>;
}

/// Starts a run unless one is going or the source has nowhere to go.
pub(crate) fn start<S: FrameDriven>(this: &Rc<RefCell<S>>) {
    let began = {
        let mut source = this.borrow_mut();
        if source.frame_loop().running || source.is_settled() {
            None
        } else {
            source.on_start();
            let frame_loop = source.frame_loop();
            frame_loop.running = true;
            Some(frame_loop.observer.clone())
        }
    };
    if let Some(observer) = began {
        log::debug!("{} started", S::NAME);
        observer.state(MotionState::Active);
    }
    schedule_frame(this);
}

pub(crate) fn stop<S: FrameDriven>(this: &Rc<RefCell<S>>) {
    let registration = {
        let mut source = this.borrow_mut();
        let frame_loop = source.frame_loop();
        frame_loop.running = false;
        frame_loop.registration.take()
    };
    drop(registration);
}

fn schedule_frame<S: FrameDriven>(this: &Rc<RefCell<S>>) {
    let clock = {
        let mut source = this.borrow_mut();
        let frame_loop = source.frame_loop();
        if !frame_loop.running || frame_loop.registration.is_some() {
            return;
        }
        frame_loop.clock.clone()
    };
    let weak = Rc::downgrade(this);
    let registration = clock.with_frame_nanos(move |time| {
        if let Some(strong) = weak.upgrade() {
            on_frame(&strong, time);
        }
    });
    this.borrow_mut().frame_loop().registration = Some(registration);
}

fn on_frame<S: FrameDriven>(this: &Rc<RefCell<S>>, frame_time_nanos: u64) {
    let delivery = {
        let mut source = this.borrow_mut();
        let frame_loop = source.frame_loop();
        frame_loop.registration = None;
        if !frame_loop.running {
            return;
        }
        let observer = frame_loop.observer.clone();
        source.step(frame_time_nanos).map(|value| (observer, value))
    };
    let Some((observer, value)) = delivery else {
        schedule_frame(this);
        return;
    };

    observer.next(value);

    // The delivery may have retargeted or stopped the source.
    let finished = {
        let mut source = this.borrow_mut();
        if source.frame_loop().running && source.is_settled() {
            source.frame_loop().running = false;
            true
        } else {
            false
        }
    };
    if finished {
        log::debug!("{} settled", S::NAME);
        observer.state(MotionState::AtRest);
    } else {
        schedule_frame(this);
    }
}
