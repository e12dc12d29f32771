use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{GestureRecognizer, GestureState, ListenerId, Point};

/// Scripted gesture recognizer.
///
/// Setters only change readouts; listeners are notified when the state is
/// moved with [`FakeRecognizer::transition`] or one of its shorthands.
pub struct FakeRecognizer {
    state: Cell<GestureState>,
    translation: Cell<Point>,
    velocity: Cell<Point>,
    rotation: Cell<f32>,
    scale: Cell<f32>,
    centroid: Cell<Point>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
    next_listener: Cell<u64>,
}

impl FakeRecognizer {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            state: Cell::new(GestureState::Possible),
            translation: Cell::new(Point::ZERO),
            velocity: Cell::new(Point::ZERO),
            rotation: Cell::new(0.0),
            scale: Cell::new(1.0),
            centroid: Cell::new(Point::ZERO),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        })
    }

    pub fn set_translation(&self, translation: Point) {
        self.translation.set(translation);
    }

    pub fn set_velocity(&self, velocity: Point) {
        self.velocity.set(velocity);
    }

    pub fn set_rotation(&self, rotation: f32) {
        self.rotation.set(rotation);
    }

    pub fn set_scale(&self, scale: f32) {
        self.scale.set(scale);
    }

    pub fn set_centroid(&self, centroid: Point) {
        self.centroid.set(centroid);
    }

    /// Moves to `state` and notifies every listener.
    pub fn transition(&self, state: GestureState) {
        self.state.set(state);
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn begin(&self) {
        self.translation.set(Point::ZERO);
        self.rotation.set(0.0);
        self.scale.set(1.0);
        self.transition(GestureState::Began);
    }

    pub fn change(&self, translation: Point) {
        self.translation.set(translation);
        self.transition(GestureState::Changed);
    }

    pub fn recognize(&self, velocity: Point) {
        self.velocity.set(velocity);
        self.transition(GestureState::Recognized);
    }

    pub fn cancel(&self) {
        self.transition(GestureState::Cancelled);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl GestureRecognizer for FakeRecognizer {
    fn state(&self) -> GestureState {
        self.state.get()
    }

    fn translation(&self) -> Point {
        self.translation.get()
    }

    fn velocity(&self) -> Point {
        self.velocity.get()
    }

    fn rotation(&self) -> f32 {
        self.rotation.get()
    }

    fn scale(&self) -> f32 {
        self.scale.get()
    }

    fn centroid(&self) -> Point {
        self.centroid.get()
    }

    fn add_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(candidate, _)| *candidate != id);
    }
}
