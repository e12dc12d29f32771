use std::rc::Rc;

use crate::observable::{Observable, Observer};
use crate::operation::{map, MapOperation, Operation};

/// Maps listed inputs to outputs; inputs without a mapping are dropped.
pub struct Rewrite<T, U> {
    mapping: Rc<[(T, U)]>,
}

impl<T, U> Clone for Rewrite<T, U> {
    fn clone(&self) -> Self {
        Self {
            mapping: Rc::clone(&self.mapping),
        }
    }
}

impl<T: PartialEq, U: Clone> Operation<T, U> for Rewrite<T, U> {
    fn next(&self, observer: &Observer<U>, value: T) {
        let rewritten = self
            .mapping
            .iter()
            .find(|(from, _)| *from == value)
            .map(|(_, to)| to.clone());
        if let Some(to) = rewritten {
            observer.next(to);
        }
    }
}

pub fn rewrite<T, U>(pairs: impl IntoIterator<Item = (T, U)>) -> Rewrite<T, U> {
    Rewrite {
        mapping: pairs.into_iter().collect(),
    }
}

/// Replaces every value with `value`.
pub fn rewrite_to<T, U: Clone + 'static>(value: U) -> MapOperation<T, U> {
    map(move |_| value.clone())
}

impl<T: PartialEq + 'static> Observable<T> {
    pub fn rewrite<U: Clone + 'static>(
        &self,
        pairs: impl IntoIterator<Item = (T, U)>,
    ) -> Observable<U> {
        self.apply(rewrite(pairs))
    }
}

impl<T: 'static> Observable<T> {
    pub fn rewrite_to<U: Clone + 'static>(&self, value: U) -> Observable<U> {
        self.apply(rewrite_to(value))
    }
}
