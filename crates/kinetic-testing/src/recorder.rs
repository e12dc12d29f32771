use std::cell::RefCell;
use std::rc::Rc;

use kinetic_core::{MotionState, Observer};

/// One delivery seen by a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event<T> {
    Value(T),
    State(MotionState),
}

/// Observer that records both channels in delivery order.
///
/// Clones share the same log.
pub struct Recorder<T> {
    events: Rc<RefCell<Vec<Event<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh observer writing into this recorder.
    pub fn observer(&self) -> Observer<T> {
        let values = Rc::clone(&self.events);
        let states = Rc::clone(&self.events);
        Observer::with_state(
            move |value| values.borrow_mut().push(Event::Value(value)),
            move |state| states.borrow_mut().push(Event::State(state)),
        )
    }

    pub fn events(&self) -> Vec<Event<T>> {
        self.events.borrow().clone()
    }

    pub fn values(&self) -> Vec<T> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Value(value) => Some(value.clone()),
                Event::State(_) => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<MotionState> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::State(state) => Some(*state),
                Event::Value(_) => None,
            })
            .collect()
    }

    pub fn last_value(&self) -> Option<T> {
        self.values().pop()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
