//! Gesture recognizer plumbing.
//!
//! Recognition itself happens elsewhere. A [`GestureRecognizer`] only has to
//! report its current state and readouts and notify listeners when its state
//! changes; [`gesture_source`] turns those notifications into a stream of
//! [`GestureSample`]s, reading the recognizer at delivery time.

use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::Point;
use crate::interaction::{Interaction, InteractionControls};
use crate::observable::{Disconnector, MotionState, Observable, Observer};
use crate::operation::Operation;
use crate::property::ReactiveProperty;
use crate::runtime::{MotionRuntime, StreamToken};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureState {
    #[default]
    Possible,
    Began,
    Changed,
    Recognized,
    Cancelled,
}

impl GestureState {
    /// Whether a gesture in this state is in progress.
    pub fn is_tracking(self) -> bool {
        matches!(self, GestureState::Began | GestureState::Changed)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, GestureState::Recognized | GestureState::Cancelled)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An externally driven gesture recognizer.
///
/// Readouts are cumulative since the gesture began: `translation` is the
/// offset from the touch-down point, `rotation` is in radians and `scale`
/// starts at 1.
pub trait GestureRecognizer {
    fn state(&self) -> GestureState;

    fn translation(&self) -> Point;

    fn velocity(&self) -> Point;

    fn rotation(&self) -> f32;

    fn scale(&self) -> f32;

    fn centroid(&self) -> Point;

    /// Registers `listener` to run after every state change.
    fn add_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Recognizer readouts captured when a state change was delivered.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureSample {
    pub state: GestureState,
    pub translation: Point,
    pub velocity: Point,
    pub rotation: f32,
    pub scale: f32,
    pub centroid: Point,
}

impl GestureSample {
    pub fn read(recognizer: &dyn GestureRecognizer) -> Self {
        Self {
            state: recognizer.state(),
            translation: recognizer.translation(),
            velocity: recognizer.velocity(),
            rotation: recognizer.rotation(),
            scale: recognizer.scale(),
            centroid: recognizer.centroid(),
        }
    }
}

fn deliver(observer: &Observer<GestureSample>, sample: GestureSample) {
    match sample.state {
        GestureState::Began => {
            observer.state(MotionState::Active);
            observer.next(sample);
        }
        GestureState::Recognized | GestureState::Cancelled => {
            observer.next(sample);
            observer.state(MotionState::AtRest);
        }
        GestureState::Possible | GestureState::Changed => observer.next(sample),
    }
}

/// A stream of samples, one per recognizer state change.
///
/// `Began` reports `Active`; `Recognized` and `Cancelled` report `AtRest`
/// after their sample. Subscribing mid-gesture reports `Active` and the
/// current sample right away.
pub fn gesture_source(recognizer: Rc<dyn GestureRecognizer>) -> Observable<GestureSample> {
    Observable::new(move |observer: Observer<GestureSample>| {
        let current = GestureSample::read(recognizer.as_ref());
        if current.state.is_tracking() {
            observer.state(MotionState::Active);
            observer.next(current);
        }

        let weak = Rc::downgrade(&recognizer);
        let listener: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(recognizer) = weak.upgrade() {
                deliver(&observer, GestureSample::read(recognizer.as_ref()));
            }
        });
        let id = recognizer.add_listener(listener);

        let weak = Rc::downgrade(&recognizer);
        Disconnector::new(move || {
            if let Some(recognizer) = weak.upgrade() {
                recognizer.remove_listener(id);
            }
        })
    })
}

/// Accumulates a gesture readout onto the value a property held when the
/// gesture began.
struct Anchored<V> {
    property: ReactiveProperty<V>,
    origin: Cell<Option<V>>,
    combine: fn(V, &GestureSample) -> V,
}

impl<V: Copy + 'static> Operation<GestureSample, V> for Anchored<V> {
    fn next(&self, observer: &Observer<V>, sample: GestureSample) {
        if sample.state == GestureState::Possible {
            return;
        }
        let origin = match self.origin.get() {
            Some(origin) if sample.state != GestureState::Began => origin,
            _ => {
                let origin = self.property.read();
                self.origin.set(Some(origin));
                origin
            }
        };
        if sample.state.is_finished() {
            self.origin.set(None);
        }
        observer.next((self.combine)(origin, &sample));
    }
}

impl Observable<GestureSample> {
    pub fn only_states(&self, states: impl IntoIterator<Item = GestureState>) -> Observable<GestureSample> {
        let states: Vec<GestureState> = states.into_iter().collect();
        self.filter(move |sample| states.contains(&sample.state))
    }

    /// The value `property` held at `Began`, plus the current translation.
    pub fn translation_added_to(&self, property: &ReactiveProperty<Point>) -> Observable<Point> {
        self.anchored(property, |origin, sample| origin + sample.translation)
    }

    /// The value `property` held at `Began`, plus the current rotation.
    pub fn rotated_from(&self, property: &ReactiveProperty<f32>) -> Observable<f32> {
        self.anchored(property, |origin, sample| origin + sample.rotation)
    }

    /// The value `property` held at `Began`, times the current scale.
    pub fn scaled_from(&self, property: &ReactiveProperty<f32>) -> Observable<f32> {
        self.anchored(property, |origin, sample| origin * sample.scale)
    }

    /// Release velocity of recognized gestures.
    pub fn velocity_on_release(&self) -> Observable<Point> {
        self.only_states([GestureState::Recognized])
            .map(|sample| sample.velocity)
    }

    pub fn centroid(&self) -> Observable<Point> {
        self.map(|sample| sample.centroid)
    }

    fn anchored<V: Copy + 'static>(
        &self,
        property: &ReactiveProperty<V>,
        combine: fn(V, &GestureSample) -> V,
    ) -> Observable<V> {
        let property = property.clone();
        self.compose(move || Anchored {
            property: property.clone(),
            origin: Cell::new(None),
            combine,
        })
    }
}

/// Drags a point property with a pan recognizer.
pub struct Draggable {
    controls: InteractionControls,
    recognizer: Rc<dyn GestureRecognizer>,
    position: ReactiveProperty<Point>,
    token: Cell<Option<StreamToken>>,
}

impl Draggable {
    pub fn new(recognizer: Rc<dyn GestureRecognizer>, position: ReactiveProperty<Point>) -> Self {
        Self {
            controls: InteractionControls::default(),
            recognizer,
            position,
            token: Cell::new(None),
        }
    }

    pub fn position(&self) -> &ReactiveProperty<Point> {
        &self.position
    }

    /// Token of the runtime stream writing the position, once connected.
    pub fn token(&self) -> Option<StreamToken> {
        self.token.get()
    }

    /// The gated drag stream, not yet connected anywhere.
    pub fn stream(&self) -> Observable<Point> {
        gesture_source(Rc::clone(&self.recognizer))
            .gated_by(&self.controls.enabled)
            .observe_state(&self.controls.state)
            .translation_added_to(&self.position)
    }
}

impl Interaction for Draggable {
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
        let token = runtime.write(&self.stream(), &self.position);
        self.token.set(Some(token));
    }
}
