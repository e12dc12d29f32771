//! Time-based interpolation toward a destination.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{
    Disconnector, FrameClock, Interaction, InteractionControls, MotionRuntime, MotionState,
    Observable, Observer, ReactiveProperty, StreamToken, Subscription,
};

use crate::easing::Easing;
use crate::error::SpringError;
use crate::frame_loop::{self, FrameDriven, FrameLoop};
use crate::vectorizer::{Vector, Vectorizer};

/// Duration, easing and start delay of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub duration_nanos: u64,
    pub easing: Easing,
    pub delay_nanos: u64,
}

impl TweenSpec {
    pub fn millis(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_nanos: duration_millis * 1_000_000,
            easing,
            delay_nanos: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::millis(duration_millis, Easing::Linear)
    }

    pub fn with_delay_millis(mut self, delay_millis: u64) -> Self {
        self.delay_nanos = delay_millis * 1_000_000;
        self
    }

    /// Eased progress `elapsed_nanos` after the tween started, or `None`
    /// while the delay has not passed yet.
    pub fn progress(&self, elapsed_nanos: u64) -> Option<(f32, bool)> {
        let running = elapsed_nanos.checked_sub(self.delay_nanos)?;
        let linear = (running as f64 / self.duration_nanos.max(1) as f64).min(1.0) as f32;
        Some((self.easing.transform(linear), linear >= 1.0))
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::millis(300, Easing::FastOutSlowIn)
    }
}

/// Animates `target` to `destination` over a fixed duration.
///
/// Writing the destination mid-flight starts a new tween from the current
/// value.
pub struct Tween<T> {
    target: ReactiveProperty<T>,
    destination: ReactiveProperty<T>,
    spec: ReactiveProperty<TweenSpec>,
    vectorizer: Rc<dyn Vectorizer<T>>,
    controls: InteractionControls,
    token: Cell<Option<StreamToken>>,
}

impl<T: Clone + 'static> Tween<T> {
    pub fn new(
        target: ReactiveProperty<T>,
        vectorizer: impl Vectorizer<T> + 'static,
        spec: TweenSpec,
    ) -> Result<Self, SpringError> {
        let current = target.read();
        vectorizer.validate(&current)?;
        Ok(Self {
            destination: ReactiveProperty::new(current),
            target,
            spec: ReactiveProperty::new(spec),
            vectorizer: Rc::new(vectorizer),
            controls: InteractionControls::default(),
            token: Cell::new(None),
        })
    }

    pub fn target(&self) -> &ReactiveProperty<T> {
        &self.target
    }

    pub fn destination(&self) -> &ReactiveProperty<T> {
        &self.destination
    }

    pub fn spec(&self) -> &ReactiveProperty<TweenSpec> {
        &self.spec
    }

    pub fn stream(&self, clock: &FrameClock) -> Observable<T> {
        let target = self.target.clone();
        let destination = self.destination.clone();
        let spec = self.spec.clone();
        let vectorizer = Rc::clone(&self.vectorizer);
        let clock = clock.clone();
        Observable::new(move |observer: Observer<T>| {
            let current = target.read();
            let to = destination.read();
            if let Err(error) = vectorizer
                .validate(&current)
                .and_then(|()| vectorizer.validate(&to))
            {
                log::warn!("tween not started: {error}");
                return Disconnector::noop();
            }
            let current = vectorizer.to_vector(&current);
            let source = Rc::new(RefCell::new(TweenSource {
                from: current.clone(),
                current,
                to: vectorizer.to_vector(&to),
                vectorizer: Rc::clone(&vectorizer),
                spec: spec.clone(),
                frame_loop: FrameLoop::new(clock.clone(), observer),
                started_nanos: None,
            }));

            let weak = Rc::downgrade(&source);
            let vectorizer = Rc::clone(&vectorizer);
            let retarget: Subscription = destination.stream().subscribe_fn(move |value| {
                let Some(source) = weak.upgrade() else {
                    return;
                };
                match vectorizer.validate(&value) {
                    Ok(()) => TweenSource::retarget(&source, vectorizer.to_vector(&value)),
                    Err(error) => log::warn!("tween destination ignored: {error}"),
                }
            });
            frame_loop::start(&source);

            Disconnector::new(move || {
                retarget.unsubscribe();
                frame_loop::stop(&source);
            })
        })
    }

    pub fn interaction_stream(&self, clock: &FrameClock) -> Observable<T> {
        self.stream(clock)
            .gated_by(&self.controls.enabled)
            .observe_state(&self.controls.state)
    }
}

impl<T: Clone + 'static> Interaction for Tween<T> {
    fn enabled(&self) -> &ReactiveProperty<bool> {
        &self.controls.enabled
    }

    fn state(&self) -> Observable<MotionState> {
        self.controls.state_stream()
    }

    fn connect(&self, runtime: &MotionRuntime) {
        if let Some(previous) = self.token.take() {
            runtime.disconnect(previous);
        }
        let token = runtime.write(&self.interaction_stream(runtime.clock()), &self.target);
        self.token.set(Some(token));
    }
}

struct TweenSource<T> {
    from: Vector,
    current: Vector,
    to: Vector,
    vectorizer: Rc<dyn Vectorizer<T>>,
    spec: ReactiveProperty<TweenSpec>,
    frame_loop: FrameLoop<T>,
    started_nanos: Option<u64>,
}

type SourceCell<T> = Rc<RefCell<TweenSource<T>>>;

impl<T: 'static> FrameDriven for TweenSource<T> {
    type Value = T;

    const NAME: &'static str = "tween";

    fn frame_loop(&mut self) -> &mut FrameLoop<T> {
        &mut self.frame_loop
    }

    fn is_settled(&self) -> bool {
        self.current == self.to
    }

    fn step(&mut self, frame_time_nanos: u64) -> Option<T> {
        let started = *self.started_nanos.get_or_insert(frame_time_nanos);
        let (progress, done) = self
            .spec
            .read()
            .progress(frame_time_nanos.saturating_sub(started))?;
        let progress = f64::from(progress);
        for ((slot, start), end) in self.current.iter_mut().zip(&self.from).zip(&self.to) {
            *slot = if done {
                *end
            } else {
                start + (end - start) * progress
            };
        }
        Some(self.vectorizer.compose(&self.current))
    }
}

impl<T: 'static> TweenSource<T> {
    fn retarget(this: &SourceCell<T>, to: Vector) {
        {
            let mut source = this.borrow_mut();
            if source.to == to {
                return;
            }
            source.from = source.current.clone();
            source.to = to;
            source.started_nanos = None;
        }
        frame_loop::start(this);
    }
}

#[cfg(test)]
#[path = "tests/tween_tests.rs"]
mod tests;
