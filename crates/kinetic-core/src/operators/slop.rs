use crate::observable::Observable;
use crate::operators::threshold::ThresholdSide;

/// Transition reported by [`Observable::slop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlopEvent {
    /// The value left the slop region.
    Exit,
    /// The value came back inside the slop region.
    Return,
}

impl<T: PartialOrd + Clone + 'static> Observable<T> {
    /// Hysteresis gate around `[min, max]`.
    ///
    /// Silent until the value first leaves the region, then reports each
    /// crossing once.
    pub fn slop(&self, min: T, max: T) -> Observable<SlopEvent> {
        self.threshold_range(min, max)
            .rewrite([
                (ThresholdSide::Below, SlopEvent::Exit),
                (ThresholdSide::Within, SlopEvent::Return),
                (ThresholdSide::Above, SlopEvent::Exit),
            ])
            .dedupe()
            .ignore_until(SlopEvent::Exit)
    }
}
