use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::observable::{Disconnector, MotionState, Observable, Observer, Subscription};

struct Shared<T> {
    observers: SmallVec<[Observer<T>; 2]>,
    last_value: Option<T>,
    last_state: MotionState,
    upstream: Option<Subscription>,
    connected: bool,
    connections: usize,
}

impl<T> Shared<T> {
    fn new() -> Self {
        Self {
            observers: SmallVec::new(),
            last_value: None,
            last_state: MotionState::AtRest,
            upstream: None,
            connected: false,
            connections: 0,
        }
    }
}

fn relay_value<T: Clone>(shared: &Weak<RefCell<Shared<T>>>, value: T) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let observers = {
        let mut shared = shared.borrow_mut();
        shared.last_value = Some(value.clone());
        shared.observers.clone()
    };
    for observer in observers {
        observer.next(value.clone());
    }
}

fn relay_state<T>(shared: &Weak<RefCell<Shared<T>>>, state: MotionState) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let observers = {
        let mut shared = shared.borrow_mut();
        shared.last_state = state;
        shared.observers.clone()
    };
    for observer in observers {
        observer.state(state);
    }
}

/// Handle returned by [`Observable::remember`] alongside the stream, used to
/// inspect the shared upstream connection.
#[derive(Clone)]
pub struct RememberHandle<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> RememberHandle<T> {
    /// Whether the upstream subscription is currently open.
    pub fn is_connected(&self) -> bool {
        self.shared.borrow().connected
    }

    /// How many times the upstream has been connected so far.
    pub fn connections(&self) -> usize {
        self.shared.borrow().connections
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().observers.len()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Shares a single upstream subscription between all subscribers and
    /// replays the last value to late subscribers.
    ///
    /// The first subscriber connects upstream; the last one to leave
    /// disconnects it. A late subscriber also receives `Active` when the
    /// upstream is currently in motion.
    pub fn remember(&self) -> Observable<T> {
        self.remember_with_handle().0
    }

    pub fn remember_with_handle(&self) -> (Observable<T>, RememberHandle<T>) {
        let upstream = self.clone();
        let shared = Rc::new(RefCell::new(Shared::new()));
        let handle = RememberHandle {
            shared: Rc::clone(&shared),
        };

        let stream = Observable::new(move |observer: Observer<T>| {
            let (first, replay, replay_state) = {
                let mut state = shared.borrow_mut();
                state.observers.push(observer.clone());
                let first = !state.connected;
                if first {
                    state.connected = true;
                    state.connections += 1;
                }
                (first, state.last_value.clone(), state.last_state)
            };

            if first {
                let weak_value = Rc::downgrade(&shared);
                let weak_state = Rc::downgrade(&shared);
                let subscription = upstream.subscribe(Observer::with_state(
                    move |value| relay_value(&weak_value, value),
                    move |state| relay_state(&weak_state, state),
                ));
                let mut state = shared.borrow_mut();
                if state.connected {
                    state.upstream = Some(subscription);
                } else {
                    // Every subscriber left while the upstream was connecting.
                    drop(state);
                    subscription.unsubscribe();
                }
            } else {
                if replay_state.is_active() {
                    observer.state(MotionState::Active);
                }
                if let Some(value) = replay {
                    observer.next(value);
                }
            }

            let shared = Rc::clone(&shared);
            let id = observer.id();
            Disconnector::new(move || {
                let upstream = {
                    let mut state = shared.borrow_mut();
                    state.observers.retain(|o| o.id() != id);
                    if state.observers.is_empty() {
                        state.last_value = None;
                        state.last_state = MotionState::AtRest;
                        state.connected = false;
                        state.upstream.take()
                    } else {
                        None
                    }
                };
                if let Some(upstream) = upstream {
                    upstream.unsubscribe();
                }
            })
        });

        (stream, handle)
    }
}
