//! Clamping and arithmetic maps.

use std::ops::{Add, Mul};

use crate::observable::Observable;
use crate::operation::{map, MapOperation};

/// Clamps values to `[bound, +inf)`.
pub fn lower_bound<T: PartialOrd + Clone + 'static>(bound: T) -> MapOperation<T, T> {
    map(move |value: T| {
        if value < bound {
            bound.clone()
        } else {
            value
        }
    })
}

/// Clamps values to `(-inf, bound]`.
pub fn upper_bound<T: PartialOrd + Clone + 'static>(bound: T) -> MapOperation<T, T> {
    map(move |value: T| {
        if value > bound {
            bound.clone()
        } else {
            value
        }
    })
}

pub fn offset_by<T: Add<Output = T> + Clone + 'static>(offset: T) -> MapOperation<T, T> {
    map(move |value: T| value + offset.clone())
}

pub fn scaled_by<T: Mul<Output = T> + Clone + 'static>(factor: T) -> MapOperation<T, T> {
    map(move |value: T| value * factor.clone())
}

impl<T: PartialOrd + Clone + 'static> Observable<T> {
    pub fn lower_bound(&self, bound: T) -> Observable<T> {
        self.apply(lower_bound(bound))
    }

    pub fn upper_bound(&self, bound: T) -> Observable<T> {
        self.apply(upper_bound(bound))
    }
}

impl<T: Add<Output = T> + Clone + 'static> Observable<T> {
    pub fn offset_by(&self, offset: T) -> Observable<T> {
        self.apply(offset_by(offset))
    }
}

impl<T: Mul<Output = T> + Clone + 'static> Observable<T> {
    pub fn scaled_by(&self, factor: T) -> Observable<T> {
        self.apply(scaled_by(factor))
    }
}
