//! Motion runtime.
//!
//! The runtime owns every subscription it creates and folds their state
//! channels into one aggregate [`MotionState`]: `Active` while at least one
//! managed stream is active, `AtRest` otherwise. Only changes in the
//! emptiness of the active set are published, so N producers going to rest
//! one after another produce a single `AtRest`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::collections::map::HashSet;
use crate::frame_clock::FrameClock;
use crate::interaction::Interaction;
use crate::observable::{MotionState, Observable, Observer, Subscription};
use crate::property::{PropertyAccessor, ReactiveProperty};
use crate::registry::TargetRegistry;

/// Handle to a stream managed by a [`MotionRuntime`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamToken(u64);

impl StreamToken {
    fn index(self) -> u64 {
        self.0
    }
}

struct RuntimeInner {
    clock: FrameClock,
    subscriptions: RefCell<Vec<(StreamToken, Subscription)>>,
    active: RefCell<HashSet<StreamToken>>,
    state: ReactiveProperty<MotionState>,
    next_token: Cell<u64>,
    registry: RefCell<TargetRegistry>,
}

impl RuntimeInner {
    fn next_token(&self) -> StreamToken {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        StreamToken(token)
    }

    fn report(&self, token: StreamToken, state: MotionState) {
        let transition = {
            let mut active = self.active.borrow_mut();
            let was_idle = active.is_empty();
            match state {
                MotionState::Active => {
                    active.insert(token);
                }
                MotionState::AtRest => {
                    active.remove(&token);
                }
            }
            let idle = active.is_empty();
            (was_idle != idle).then_some(if idle {
                MotionState::AtRest
            } else {
                MotionState::Active
            })
        };
        if let Some(aggregate) = transition {
            log::debug!("runtime aggregate state -> {aggregate:?} (via {token:?})");
            self.state.write(aggregate);
        }
    }
}

/// Owner of managed subscriptions, aggregate state and per-target caches.
///
/// Cloning yields another handle to the same runtime. Dropping the last
/// handle disconnects everything the runtime still owns.
#[derive(Clone)]
pub struct MotionRuntime {
    inner: Rc<RuntimeInner>,
}

impl MotionRuntime {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                clock,
                subscriptions: RefCell::new(Vec::new()),
                active: RefCell::new(HashSet::default()),
                state: ReactiveProperty::new(MotionState::AtRest),
                next_token: Cell::new(1),
                registry: RefCell::new(TargetRegistry::default()),
            }),
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.inner.clock
    }

    /// Subscribes `observer` to `stream` and tracks the stream's state.
    pub fn subscribe<T: 'static>(&self, stream: &Observable<T>, observer: Observer<T>) -> StreamToken {
        let token = self.inner.next_token();
        let runtime: Weak<RuntimeInner> = Rc::downgrade(&self.inner);
        let value_target = observer.clone();
        let subscription = stream.subscribe(Observer::with_state(
            move |value| value_target.next(value),
            move |state| {
                if let Some(runtime) = runtime.upgrade() {
                    runtime.report(token, state);
                }
                observer.state(state);
            },
        ));
        self.inner
            .subscriptions
            .borrow_mut()
            .push((token, subscription));
        token
    }

    /// Writes every value of `stream` into `property`.
    pub fn write<T: 'static>(&self, stream: &Observable<T>, property: &ReactiveProperty<T>) -> StreamToken
    where
        T: Clone,
    {
        let property = property.clone();
        self.subscribe(stream, Observer::new(move |value| property.write(value)))
    }

    /// Enables `consumer` whenever `producer` reports `trigger`.
    pub fn start(
        &self,
        consumer: &dyn Interaction,
        producer: &dyn Interaction,
        trigger: MotionState,
    ) -> StreamToken {
        let enabling = producer.state().dedupe().rewrite([(trigger, true)]);
        self.write(&enabling, consumer.enabled())
    }

    /// Tears down one managed stream. Unknown tokens are ignored.
    pub fn disconnect(&self, token: StreamToken) {
        let removed = {
            let mut subscriptions = self.inner.subscriptions.borrow_mut();
            subscriptions
                .iter()
                .position(|(candidate, _)| *candidate == token)
                .map(|index| subscriptions.remove(index))
        };
        if let Some((_, subscription)) = removed {
            log::trace!("runtime disconnect {token:?}");
            subscription.unsubscribe();
            self.inner.report(token, MotionState::AtRest);
        }
    }

    pub fn disconnect_all(&self) {
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        log::trace!("runtime disconnecting {} streams", subscriptions.len());
        for (token, subscription) in subscriptions {
            subscription.unsubscribe();
            self.inner.report(token, MotionState::AtRest);
        }
    }

    pub fn stream_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Aggregate state; subscribers receive the current value first.
    pub fn state(&self) -> &ReactiveProperty<MotionState> {
        &self.inner.state
    }

    pub fn is_active(&self) -> bool {
        !self.inner.active.borrow().is_empty()
    }

    /// Attaches `interaction` to `target` and connects it to this runtime.
    ///
    /// Streams opened by the connect belong to `target`: once the target is
    /// gone and its entry purged, they are disconnected.
    pub fn add_interaction<Target, I>(&self, target: &Rc<Target>, interaction: Rc<I>)
    where
        Target: 'static,
        I: Interaction + 'static,
    {
        let erased: Rc<dyn Any> = interaction.clone();
        self.inner
            .registry
            .borrow_mut()
            .add_interaction(target, erased);

        let first = self.inner.next_token.get();
        interaction.connect(self);
        let opened: Vec<StreamToken> = self
            .inner
            .subscriptions
            .borrow()
            .iter()
            .map(|(token, _)| *token)
            .filter(|token| token.index() >= first)
            .collect();
        self.inner.registry.borrow_mut().add_streams(target, opened);
        self.release_orphans();
    }

    /// Interactions of type `I` attached to `target`, in attach order.
    pub fn interactions_for<Target: 'static, I: 'static>(&self, target: &Rc<Target>) -> Vec<Rc<I>> {
        self.inner.registry.borrow().interactions(target)
    }

    pub fn interaction_count<Target: 'static>(&self, target: &Rc<Target>) -> usize {
        self.inner.registry.borrow().interaction_count(target)
    }

    /// The property for `accessor` on `target`, created on first use.
    ///
    /// Repeated calls with the same target and accessor name return handles
    /// to the same property.
    pub fn property<Target, T, A>(&self, target: &Rc<Target>, accessor: A) -> ReactiveProperty<T>
    where
        Target: 'static,
        T: Clone + 'static,
        A: PropertyAccessor<Target, T> + 'static,
    {
        let name = accessor.name();
        let property = self
            .inner
            .registry
            .borrow_mut()
            .property(target, name, || ReactiveProperty::backed(target, accessor));
        self.release_orphans();
        property
    }

    /// Drops cache entries of targets that no longer exist and disconnects
    /// the streams opened for them.
    pub fn purge_targets(&self) -> usize {
        let removed = self.inner.registry.borrow_mut().purge();
        self.release_orphans();
        removed
    }

    fn release_orphans(&self) {
        let orphaned = self.inner.registry.borrow_mut().take_orphaned();
        for token in orphaned {
            self.disconnect(token);
        }
    }

    pub fn target_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }
}

impl Default for MotionRuntime {
    fn default() -> Self {
        Self::new(FrameClock::default())
    }
}

impl fmt::Debug for MotionRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionRuntime")
            .field("streams", &self.stream_count())
            .field("active", &self.inner.active.borrow().len())
            .field("targets", &self.target_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
