use super::*;

use crate::property::ReactiveProperty;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counting_source(connects: Rc<Cell<usize>>, disconnects: Rc<Cell<usize>>) -> Observable<i32> {
    Observable::new(move |observer: Observer<i32>| {
        connects.set(connects.get() + 1);
        observer.next(7);
        let disconnects = Rc::clone(&disconnects);
        Disconnector::new(move || disconnects.set(disconnects.get() + 1))
    })
}

#[test]
fn each_subscription_connects_once() {
    let connects = Rc::new(Cell::new(0));
    let disconnects = Rc::new(Cell::new(0));
    let source = counting_source(Rc::clone(&connects), Rc::clone(&disconnects));

    let first = source.subscribe_fn(|_| {});
    let second = source.subscribe_fn(|_| {});
    assert_eq!(connects.get(), 2);
    assert_eq!(disconnects.get(), 0);

    first.unsubscribe();
    second.unsubscribe();
    assert_eq!(disconnects.get(), 2);
}

#[test]
fn unsubscribe_is_idempotent() {
    let connects = Rc::new(Cell::new(0));
    let disconnects = Rc::new(Cell::new(0));
    let source = counting_source(connects, Rc::clone(&disconnects));

    let subscription = source.subscribe_fn(|_| {});
    assert!(subscription.is_active());
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(!subscription.is_active());
    drop(subscription);
    assert_eq!(disconnects.get(), 1);
}

#[test]
fn dropping_a_subscription_disconnects() {
    let connects = Rc::new(Cell::new(0));
    let disconnects = Rc::new(Cell::new(0));
    let source = counting_source(connects, Rc::clone(&disconnects));

    {
        let _subscription = source.subscribe_fn(|_| {});
    }
    assert_eq!(disconnects.get(), 1);
}

#[test]
fn unsubscribe_during_delivery_stops_delivery() {
    let property = ReactiveProperty::new(0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let subscription = {
        let seen = Rc::clone(&seen);
        let slot = Rc::clone(&slot);
        property.stream().subscribe_fn(move |value| {
            seen.borrow_mut().push(value);
            if value == 2 {
                if let Some(subscription) = slot.borrow().as_ref() {
                    subscription.unsubscribe();
                }
            }
        })
    };
    *slot.borrow_mut() = Some(subscription);

    property.write(1);
    property.write(2);
    property.write(3);

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(property.observer_count(), 0);
}

#[test]
fn disconnector_runs_once() {
    let runs = Rc::new(Cell::new(0));
    let mut disconnector = {
        let runs = Rc::clone(&runs);
        Disconnector::new(move || runs.set(runs.get() + 1))
    };
    assert!(!disconnector.is_disconnected());
    disconnector.disconnect();
    disconnector.disconnect();
    assert!(disconnector.is_disconnected());
    assert_eq!(runs.get(), 1);
}

#[test]
fn from_values_replays_to_every_subscriber() {
    let source = Observable::from_values([1, 2, 3]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..2 {
        let seen = Rc::clone(&seen);
        let _subscription = source.subscribe_fn(move |value| seen.borrow_mut().push(value));
    }

    assert_eq!(*seen.borrow(), vec![1, 2, 3, 1, 2, 3]);
}

#[test]
fn of_and_empty() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _a = Observable::of("x").subscribe_fn(move |value| sink.borrow_mut().push(value));
    let sink = Rc::clone(&seen);
    let _b = Observable::<&str>::empty().subscribe_fn(move |value| sink.borrow_mut().push(value));
    assert_eq!(*seen.borrow(), vec!["x"]);
}

#[test]
fn merge_interleaves_both_channels() {
    let left = ReactiveProperty::new(1);
    let right = ReactiveProperty::new(10);
    let values = Rc::new(RefCell::new(Vec::new()));
    let states = Rc::new(RefCell::new(Vec::new()));

    let state_source = Observable::new(|observer: Observer<i32>| {
        observer.state(MotionState::Active);
        Disconnector::noop()
    });

    let merged = left.stream().merge(&right.stream()).merge(&state_source);
    let subscription = {
        let values = Rc::clone(&values);
        let states = Rc::clone(&states);
        merged.subscribe_with_state(
            move |value| values.borrow_mut().push(value),
            move |state| states.borrow_mut().push(state),
        )
    };

    left.write(2);
    right.write(20);
    assert_eq!(*values.borrow(), vec![1, 10, 2, 20]);
    assert_eq!(*states.borrow(), vec![MotionState::Active]);

    subscription.unsubscribe();
    assert_eq!(left.observer_count(), 0);
    assert_eq!(right.observer_count(), 0);
}

#[test]
fn observer_clones_share_identity() {
    let observer = Observer::new(|_: i32| {});
    let other = Observer::new(|_: i32| {});
    assert_eq!(observer.id(), observer.clone().id());
    assert_ne!(observer.id(), other.id());
}
