//! Push-based observable primitive.
//!
//! An [`Observable`] is nothing more than a shared connect function. Every call
//! to [`Observable::subscribe`] invokes that function once with a fresh
//! [`Observer`] and keeps the returned [`Disconnector`] inside the resulting
//! [`Subscription`]. There is no hidden multicast: two subscriptions run the
//! connect function twice. Use [`Observable::remember`] to share one upstream
//! connection between many subscribers.
//!
//! Values travel on the `next` channel. A secondary channel carries
//! [`MotionState`] transitions so that downstream consumers (most notably the
//! runtime) can tell whether the producer is currently in motion.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Activity reported on the state channel of a stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MotionState {
    #[default]
    AtRest = 0,
    Active = 1,
}

impl MotionState {
    pub fn is_active(self) -> bool {
        matches!(self, MotionState::Active)
    }
}

/// Identity of an observer allocation.
///
/// Clones of an [`Observer`] share the same identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

struct ObserverInner<T> {
    next: Box<dyn Fn(T)>,
    state: Option<Box<dyn Fn(MotionState)>>,
}

/// Receiver of values and state transitions.
pub struct Observer<T> {
    inner: Rc<ObserverInner<T>>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id())
            .field("observes_state", &self.inner.state.is_some())
            .finish()
    }
}

impl<T> Observer<T> {
    /// Creates an observer that only listens to values.
    pub fn new(next: impl Fn(T) + 'static) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                next: Box::new(next),
                state: None,
            }),
        }
    }

    /// Creates an observer listening to both values and state transitions.
    pub fn with_state(next: impl Fn(T) + 'static, state: impl Fn(MotionState) + 'static) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                next: Box::new(next),
                state: Some(Box::new(state)),
            }),
        }
    }

    pub fn next(&self, value: T) {
        (self.inner.next)(value);
    }

    pub fn state(&self, state: MotionState) {
        if let Some(callback) = &self.inner.state {
            callback(state);
        }
    }

    pub fn id(&self) -> ObserverId {
        ObserverId(Rc::as_ptr(&self.inner) as *const () as usize)
    }
}

/// One-shot teardown returned by a connect function.
///
/// Running it a second time does nothing.
pub struct Disconnector {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Disconnector {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A disconnector with nothing to release.
    pub fn noop() -> Self {
        Self { teardown: None }
    }

    pub fn disconnect(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.teardown.is_none()
    }
}

impl fmt::Debug for Disconnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disconnector")
            .field("disconnected", &self.is_disconnected())
            .finish()
    }
}

/// A live connection between an observable and an observer.
///
/// Dropping the subscription disconnects it. [`Subscription::unsubscribe`] may
/// be called any number of times, including from inside a delivery to the
/// observer it guards; after the first call the observer receives nothing.
#[must_use = "dropping a Subscription disconnects it"]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
    disconnector: RefCell<Disconnector>,
}

impl Subscription {
    pub(crate) fn new(alive: Rc<Cell<bool>>, disconnector: Disconnector) -> Self {
        Self {
            alive,
            disconnector: RefCell::new(disconnector),
        }
    }

    /// A subscription that is already disconnected.
    pub fn empty() -> Self {
        Self::new(Rc::new(Cell::new(false)), Disconnector::noop())
    }

    pub fn is_active(&self) -> bool {
        self.alive.get()
    }

    pub fn unsubscribe(&self) {
        if !self.alive.replace(false) {
            return;
        }
        // Take the teardown out first so a re-entrant unsubscribe never
        // observes an outstanding borrow.
        let mut disconnector = std::mem::replace(
            &mut *self.disconnector.borrow_mut(),
            Disconnector::noop(),
        );
        disconnector.disconnect();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Wraps `observer` so that nothing reaches it once `alive` is cleared.
pub(crate) fn gate<T: 'static>(observer: Observer<T>) -> (Observer<T>, Rc<Cell<bool>>) {
    let alive = Rc::new(Cell::new(true));
    let next_alive = Rc::clone(&alive);
    let state_alive = Rc::clone(&alive);
    let next_observer = observer.clone();
    let gated = Observer::with_state(
        move |value| {
            if next_alive.get() {
                next_observer.next(value);
            }
        },
        move |state| {
            if state_alive.get() {
                observer.state(state);
            }
        },
    );
    (gated, alive)
}

type ConnectFn<T> = dyn Fn(Observer<T>) -> Disconnector;

/// A lazily connected stream of values.
pub struct Observable<T> {
    connect: Rc<ConnectFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            connect: Rc::clone(&self.connect),
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: 'static> Observable<T> {
    pub fn new(connect: impl Fn(Observer<T>) -> Disconnector + 'static) -> Self {
        Self {
            connect: Rc::new(connect),
        }
    }

    /// An observable that never emits.
    pub fn empty() -> Self {
        Self::new(|_| Disconnector::noop())
    }

    /// Emits `value` once to every new subscriber.
    pub fn of(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move |observer| {
            observer.next(value.clone());
            Disconnector::noop()
        })
    }

    /// Emits every item of `values`, in order, to every new subscriber.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        let values: Rc<[T]> = values.into_iter().collect();
        Self::new(move |observer| {
            for value in values.iter() {
                observer.next(value.clone());
            }
            Disconnector::noop()
        })
    }

    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let (gated, alive) = gate(observer);
        log::trace!("observable connect");
        let disconnector = (self.connect)(gated);
        Subscription::new(alive, disconnector)
    }

    pub fn subscribe_fn(&self, next: impl Fn(T) + 'static) -> Subscription {
        self.subscribe(Observer::new(next))
    }

    pub fn subscribe_with_state(
        &self,
        next: impl Fn(T) + 'static,
        state: impl Fn(MotionState) + 'static,
    ) -> Subscription {
        self.subscribe(Observer::with_state(next, state))
    }

    /// Interleaves the values and states of `self` and `other`.
    pub fn merge(&self, other: &Observable<T>) -> Observable<T> {
        let first = self.clone();
        let second = other.clone();
        Observable::new(move |observer| {
            let a = first.subscribe(forwarding(&observer));
            let b = second.subscribe(forwarding(&observer));
            Disconnector::new(move || {
                a.unsubscribe();
                b.unsubscribe();
            })
        })
    }
}

/// An observer that relays both channels to `downstream`.
pub(crate) fn forwarding<T: 'static>(downstream: &Observer<T>) -> Observer<T> {
    let next = downstream.clone();
    let state = downstream.clone();
    Observer::with_state(move |value| next.next(value), move |s| state.state(s))
}

#[cfg(test)]
#[path = "tests/observable_tests.rs"]
mod tests;
