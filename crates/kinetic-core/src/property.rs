//! Reactive properties: readable, writable cells that are also observables.
//!
//! A [`ReactiveProperty`] either owns its value or delegates reads and writes
//! to a [`PropertyAccessor`] on some external target. Either way every write
//! is pushed synchronously to every current subscriber, in subscription
//! order, with no diffing. Compose [`Observable::dedupe`] when repeated
//! values should be suppressed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::observable::{gate, Disconnector, Observable, Observer, ObserverId, Subscription};

/// Read/write access to one field of an external target.
///
/// `name` identifies the field when caching properties per target, so two
/// accessors of the same target must not share a name unless they address
/// the same field.
pub trait PropertyAccessor<Target: ?Sized, T> {
    fn name(&self) -> &'static str;

    fn read(&self, target: &Target) -> T;

    fn write(&self, target: &Target, value: T);
}

enum Storage<T> {
    Owned(RefCell<T>),
    Backed {
        read: Box<dyn Fn() -> Option<T>>,
        write: Box<dyn Fn(T) -> bool>,
        // Last value seen or written; answers reads once the target is gone.
        shadow: RefCell<T>,
    },
}

struct Entry<T> {
    key: ObserverId,
    observer: Observer<T>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            observer: self.observer.clone(),
        }
    }
}

struct PropertyInner<T> {
    storage: Storage<T>,
    observers: RefCell<SmallVec<[Entry<T>; 4]>>,
}

impl<T: Clone + 'static> PropertyInner<T> {
    fn read(&self) -> T {
        match &self.storage {
            Storage::Owned(value) => value.borrow().clone(),
            Storage::Backed { read, shadow, .. } => match read() {
                Some(value) => {
                    *shadow.borrow_mut() = value.clone();
                    value
                }
                None => shadow.borrow().clone(),
            },
        }
    }

    fn store(&self, value: T) {
        match &self.storage {
            Storage::Owned(cell) => *cell.borrow_mut() = value,
            Storage::Backed { write, shadow, .. } => {
                *shadow.borrow_mut() = value.clone();
                if !write(value) {
                    log::trace!("property target dropped; write kept in shadow only");
                }
            }
        }
    }

    /// Registers `observer` under `key` and replays the current value.
    /// Returns `false` when `key` is already registered.
    fn attach(&self, key: ObserverId, observer: &Observer<T>) -> bool {
        {
            let mut observers = self.observers.borrow_mut();
            if observers.iter().any(|entry| entry.key == key) {
                return false;
            }
            observers.push(Entry {
                key,
                observer: observer.clone(),
            });
        }
        observer.next(self.read());
        true
    }

    fn detach(&self, key: ObserverId) {
        self.observers.borrow_mut().retain(|entry| entry.key != key);
    }
}

/// A readable, writable, observable value.
///
/// Cloning yields another handle to the same cell.
pub struct ReactiveProperty<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T> Clone for ReactiveProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ReactiveProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveProperty")
            .field("value", &self.read())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl<T: Clone + Default + 'static> Default for ReactiveProperty<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ReactiveProperty<T> {
    pub fn new(value: T) -> Self {
        Self::from_storage(Storage::Owned(RefCell::new(value)))
    }

    /// A property delegating to `accessor` on `target`.
    ///
    /// Only a weak reference to `target` is kept.
    pub fn backed<Target, A>(target: &Rc<Target>, accessor: A) -> Self
    where
        Target: 'static,
        A: PropertyAccessor<Target, T> + 'static,
    {
        let accessor = Rc::new(accessor);
        let initial = accessor.read(target);
        let weak: Weak<Target> = Rc::downgrade(target);

        let read = {
            let accessor = Rc::clone(&accessor);
            let weak = weak.clone();
            Box::new(move || weak.upgrade().map(|target| accessor.read(&target)))
        };
        let write = Box::new(move |value: T| match weak.upgrade() {
            Some(target) => {
                accessor.write(&target, value);
                true
            }
            None => false,
        });

        Self::from_storage(Storage::Backed {
            read,
            write,
            shadow: RefCell::new(initial),
        })
    }

    fn from_storage(storage: Storage<T>) -> Self {
        Self {
            inner: Rc::new(PropertyInner {
                storage,
                observers: RefCell::new(SmallVec::new()),
            }),
        }
    }

    pub fn read(&self) -> T {
        self.inner.read()
    }

    /// Stores `value` and pushes it to every current subscriber.
    pub fn write(&self, value: T) {
        self.inner.store(value.clone());
        let observers = self.inner.observers.borrow().clone();
        for entry in observers {
            entry.observer.next(value.clone());
        }
    }

    pub fn update(&self, transform: impl FnOnce(T) -> T) {
        let next = transform(self.read());
        self.write(next);
    }

    /// A stream that replays the current value, then every write.
    pub fn stream(&self) -> Observable<T> {
        let inner = Rc::clone(&self.inner);
        Observable::new(move |observer: Observer<T>| {
            let key = observer.id();
            inner.attach(key, &observer);
            let inner = Rc::clone(&inner);
            Disconnector::new(move || inner.detach(key))
        })
    }

    /// Subscribes `observer` directly.
    ///
    /// Subscribing an observer (or a clone of it) that is already subscribed
    /// returns an inert subscription and delivers nothing.
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let key = observer.id();
        if self.is_subscribed(key) {
            return Subscription::empty();
        }
        let (gated, alive) = gate(observer);
        self.inner.attach(key, &gated);
        let inner = Rc::clone(&self.inner);
        Subscription::new(alive, Disconnector::new(move || inner.detach(key)))
    }

    pub fn is_subscribed(&self, key: ObserverId) -> bool {
        self.inner
            .observers
            .borrow()
            .iter()
            .any(|entry| entry.key == key)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
#[path = "tests/property_tests.rs"]
mod tests;
