//! Operator composition.
//!
//! An [`Operation`] transforms the values of an upstream stream and may hook
//! into the lifecycle of each downstream subscription. [`Observable::compose`]
//! builds a fresh operation for every subscription, so state kept inside an
//! operation is never shared between two subscribers or two compositions.

use std::rc::Rc;

use crate::observable::{Disconnector, Observable, Observer};

/// A per-subscription transform between an upstream and a downstream stream.
///
/// Hooks run in this order: `pre_connect`, upstream subscribe, `post_connect`;
/// and on teardown `pre_disconnect`, upstream unsubscribe, `post_disconnect`.
/// Resources acquired in the connect hooks must be released in the
/// disconnect hooks. Operations take `&self`; keep mutable state in `Cell`
/// or short-lived `RefCell` borrows, since `next` may be re-entered when a
/// downstream observer writes back into the upstream source.
pub trait Operation<T, U> {
    fn pre_connect(&self, _observer: &Observer<U>) {}

    fn post_connect(&self, _observer: &Observer<U>) {}

    fn pre_disconnect(&self, _observer: &Observer<U>) {}

    fn post_disconnect(&self, _observer: &Observer<U>) {}

    fn next(&self, observer: &Observer<U>, value: T);
}

/// Pure 1:1 transform.
pub struct MapOperation<T, U> {
    transform: Rc<dyn Fn(T) -> U>,
}

impl<T, U> Clone for MapOperation<T, U> {
    fn clone(&self) -> Self {
        Self {
            transform: Rc::clone(&self.transform),
        }
    }
}

impl<T, U> Operation<T, U> for MapOperation<T, U> {
    fn next(&self, observer: &Observer<U>, value: T) {
        observer.next((self.transform)(value));
    }
}

/// Forwards values accepted by a predicate.
pub struct FilterOperation<T> {
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T> Clone for FilterOperation<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<T> Operation<T, T> for FilterOperation<T> {
    fn next(&self, observer: &Observer<T>, value: T) {
        if (self.predicate)(&value) {
            observer.next(value);
        }
    }
}

pub fn map<T, U>(transform: impl Fn(T) -> U + 'static) -> MapOperation<T, U> {
    MapOperation {
        transform: Rc::new(transform),
    }
}

pub fn filter<T>(predicate: impl Fn(&T) -> bool + 'static) -> FilterOperation<T> {
    FilterOperation {
        predicate: Rc::new(predicate),
    }
}

impl<T: 'static> Observable<T> {
    /// Chains an operation built by `factory` onto this stream.
    ///
    /// `factory` runs once per downstream subscription. The state channel is
    /// forwarded untouched.
    pub fn compose<U, O, F>(&self, factory: F) -> Observable<U>
    where
        U: 'static,
        O: Operation<T, U> + 'static,
        F: Fn() -> O + 'static,
    {
        let upstream = self.clone();
        Observable::new(move |downstream: Observer<U>| {
            let operation = Rc::new(factory());
            operation.pre_connect(&downstream);

            let forward = {
                let operation = Rc::clone(&operation);
                let value_target = downstream.clone();
                let state_target = downstream.clone();
                Observer::with_state(
                    move |value| operation.next(&value_target, value),
                    move |state| state_target.state(state),
                )
            };
            let subscription = upstream.subscribe(forward);
            operation.post_connect(&downstream);

            Disconnector::new(move || {
                operation.pre_disconnect(&downstream);
                subscription.unsubscribe();
                operation.post_disconnect(&downstream);
            })
        })
    }

    /// Chains a stateless operation; each subscription gets its own clone.
    pub fn apply<U, O>(&self, operation: O) -> Observable<U>
    where
        U: 'static,
        O: Operation<T, U> + Clone + 'static,
    {
        self.compose(move || operation.clone())
    }

    pub fn map<U: 'static>(&self, transform: impl Fn(T) -> U + 'static) -> Observable<U> {
        self.apply(map(transform))
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Observable<T> {
        self.apply(filter(predicate))
    }
}

#[cfg(test)]
#[path = "tests/operation_tests.rs"]
mod tests;
