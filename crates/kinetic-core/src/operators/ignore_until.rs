use std::cell::Cell;

use crate::observable::{Observable, Observer};
use crate::operation::Operation;

/// Drops everything until a value equal to `expected` arrives, then stays
/// open for the rest of the subscription.
pub struct IgnoreUntil<T> {
    expected: T,
    open: Cell<bool>,
}

impl<T: PartialEq> Operation<T, T> for IgnoreUntil<T> {
    fn next(&self, observer: &Observer<T>, value: T) {
        if !self.open.get() && value == self.expected {
            self.open.set(true);
        }
        if self.open.get() {
            observer.next(value);
        }
    }
}

pub fn ignore_until<T>(expected: T) -> IgnoreUntil<T> {
    IgnoreUntil {
        expected,
        open: Cell::new(false),
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn ignore_until(&self, expected: T) -> Observable<T> {
        self.compose(move || ignore_until(expected.clone()))
    }
}
