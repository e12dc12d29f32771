use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{Disconnector, MotionState, Observable, Observer};

struct SourceInner<T> {
    observers: RefCell<Vec<Observer<T>>>,
    connects: Cell<usize>,
    disconnects: Cell<usize>,
}

/// Hot source driven by the test, counting connections.
///
/// Every value passed to [`TrackedSource::emit`] goes to every observer
/// connected at that moment.
pub struct TrackedSource<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for TrackedSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> TrackedSource<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SourceInner {
                observers: RefCell::new(Vec::new()),
                connects: Cell::new(0),
                disconnects: Cell::new(0),
            }),
        }
    }

    pub fn observable(&self) -> Observable<T> {
        let inner = Rc::clone(&self.inner);
        Observable::new(move |observer: Observer<T>| {
            inner.connects.set(inner.connects.get() + 1);
            let id = observer.id();
            inner.observers.borrow_mut().push(observer);
            let inner = Rc::clone(&inner);
            Disconnector::new(move || {
                inner.disconnects.set(inner.disconnects.get() + 1);
                inner.observers.borrow_mut().retain(|o| o.id() != id);
            })
        })
    }

    pub fn emit(&self, value: T) {
        let observers = self.inner.observers.borrow().clone();
        for observer in observers {
            observer.next(value.clone());
        }
    }

    pub fn emit_state(&self, state: MotionState) {
        let observers = self.inner.observers.borrow().clone();
        for observer in observers {
            observer.state(state);
        }
    }

    pub fn connect_count(&self) -> usize {
        self.inner.connects.get()
    }

    pub fn disconnect_count(&self) -> usize {
        self.inner.disconnects.get()
    }

    /// Connections currently open.
    pub fn live_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

impl<T: Clone + 'static> Default for TrackedSource<T> {
    fn default() -> Self {
        Self::new()
    }
}
