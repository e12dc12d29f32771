//! Enablement gating and state reporting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::observable::{Disconnector, MotionState, Observable, Observer, Subscription};
use crate::property::ReactiveProperty;

struct Gate<T> {
    upstream: Observable<T>,
    downstream: Observer<T>,
    subscription: RefCell<Option<Subscription>>,
    enabled: Cell<bool>,
    active: Rc<Cell<bool>>,
}

impl<T: 'static> Gate<T> {
    fn enable(&self) {
        if self.enabled.replace(true) {
            return;
        }
        let value_target = self.downstream.clone();
        let state_target = self.downstream.clone();
        let active = Rc::clone(&self.active);
        let subscription = self.upstream.subscribe(Observer::with_state(
            move |value| value_target.next(value),
            move |state| {
                active.set(state.is_active());
                state_target.state(state);
            },
        ));
        if self.enabled.get() {
            *self.subscription.borrow_mut() = Some(subscription);
        } else {
            // Disabled again while the upstream was connecting.
            subscription.unsubscribe();
        }
    }

    /// Tears the upstream down. Safe to call any number of times: only the
    /// first call after an enable does anything.
    fn disable(&self) {
        self.enabled.set(false);
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        if self.active.replace(false) {
            self.downstream.state(MotionState::AtRest);
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Connects upstream only while `enabled` reads `true`.
    ///
    /// Disabling mid-motion reports `AtRest` once. Disabling through the
    /// property and then disconnecting does not report it twice.
    pub fn gated_by(&self, enabled: &ReactiveProperty<bool>) -> Observable<T> {
        let upstream = self.clone();
        let enabled = enabled.clone();
        Observable::new(move |observer: Observer<T>| {
            let gate = Rc::new(Gate {
                upstream: upstream.clone(),
                downstream: observer,
                subscription: RefCell::new(None),
                enabled: Cell::new(false),
                active: Rc::new(Cell::new(false)),
            });

            let toggles = {
                let gate = Rc::downgrade(&gate);
                enabled.stream().dedupe().subscribe_fn(move |on| {
                    let Some(gate) = gate.upgrade() else {
                        return;
                    };
                    if on {
                        gate.enable();
                    } else {
                        gate.disable();
                    }
                })
            };

            Disconnector::new(move || {
                toggles.unsubscribe();
                gate.disable();
            })
        })
    }

    /// Mirrors the state channel into `sink` while forwarding both channels.
    ///
    /// Disconnecting while the last observed state is `Active` writes
    /// `AtRest` into `sink`.
    pub fn observe_state(&self, sink: &ReactiveProperty<MotionState>) -> Observable<T> {
        let upstream = self.clone();
        let sink = sink.clone();
        Observable::new(move |observer: Observer<T>| {
            let value_target = observer.clone();
            let active = Rc::new(Cell::new(false));
            let subscription = {
                let sink = sink.clone();
                let active = Rc::clone(&active);
                upstream.subscribe(Observer::with_state(
                    move |value| value_target.next(value),
                    move |state| {
                        active.set(state.is_active());
                        sink.write(state);
                        observer.state(state);
                    },
                ))
            };
            let sink = sink.clone();
            Disconnector::new(move || {
                subscription.unsubscribe();
                if active.replace(false) {
                    sink.write(MotionState::AtRest);
                }
            })
        })
    }
}
