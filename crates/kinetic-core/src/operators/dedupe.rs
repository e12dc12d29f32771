use std::cell::RefCell;

use crate::observable::{Observable, Observer};
use crate::operation::Operation;

/// Drops values equal to the previously forwarded one.
///
/// The first value always passes. Equality is `PartialEq` value equality.
pub struct Dedupe<T> {
    last: RefCell<Option<T>>,
}

impl<T> Default for Dedupe<T> {
    fn default() -> Self {
        Self {
            last: RefCell::new(None),
        }
    }
}

impl<T: Clone + PartialEq> Operation<T, T> for Dedupe<T> {
    fn next(&self, observer: &Observer<T>, value: T) {
        let changed = {
            let mut last = self.last.borrow_mut();
            if last.as_ref() == Some(&value) {
                false
            } else {
                *last = Some(value.clone());
                true
            }
        };
        if changed {
            observer.next(value);
        }
    }
}

pub fn dedupe<T>() -> Dedupe<T> {
    Dedupe::default()
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn dedupe(&self) -> Observable<T> {
        self.compose(dedupe::<T>)
    }
}
