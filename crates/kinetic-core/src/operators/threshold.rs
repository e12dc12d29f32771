use crate::observable::{Observable, Observer};
use crate::operation::Operation;

/// Where a value sits relative to a threshold or range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ThresholdSide {
    Below,
    Within,
    Above,
}

/// Classifies values against the inclusive range `[min, max]`.
///
/// A range with `min > max` emits nothing.
#[derive(Clone, Debug)]
pub struct ThresholdRange<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd> Operation<T, ThresholdSide> for ThresholdRange<T> {
    fn next(&self, observer: &Observer<ThresholdSide>, value: T) {
        if self.min > self.max {
            return;
        }
        let side = if value < self.min {
            ThresholdSide::Below
        } else if value > self.max {
            ThresholdSide::Above
        } else {
            ThresholdSide::Within
        };
        observer.next(side);
    }
}

/// Classifies values against a single point; equality is `Within`.
#[derive(Clone, Debug)]
pub struct Threshold<T> {
    value: T,
}

impl<T: PartialOrd> Operation<T, ThresholdSide> for Threshold<T> {
    fn next(&self, observer: &Observer<ThresholdSide>, value: T) {
        let side = if value < self.value {
            ThresholdSide::Below
        } else if value > self.value {
            ThresholdSide::Above
        } else {
            ThresholdSide::Within
        };
        observer.next(side);
    }
}

pub fn threshold_range<T>(min: T, max: T) -> ThresholdRange<T> {
    ThresholdRange { min, max }
}

pub fn threshold<T>(value: T) -> Threshold<T> {
    Threshold { value }
}

impl<T: PartialOrd + Clone + 'static> Observable<T> {
    pub fn threshold_range(&self, min: T, max: T) -> Observable<ThresholdSide> {
        self.apply(threshold_range(min, max))
    }

    pub fn threshold(&self, value: T) -> Observable<ThresholdSide> {
        self.apply(threshold(value))
    }
}
