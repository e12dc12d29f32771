use super::*;

use std::cell::RefCell;

struct Switch {
    controls: crate::interaction::InteractionControls,
}

impl Interaction for Switch {
    fn enabled(&self) -> &ReactiveProperty<bool> {
        &self.controls.enabled
    }

    fn state(&self) -> Observable<MotionState> {
        self.controls.state_stream()
    }

    fn connect(&self, _runtime: &MotionRuntime) {}
}

fn state_source() -> (Observable<i32>, Rc<RefCell<Vec<Observer<i32>>>>) {
    let observers: Rc<RefCell<Vec<Observer<i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let registered = Rc::clone(&observers);
    let stream = Observable::new(move |observer: Observer<i32>| {
        registered.borrow_mut().push(observer);
        crate::observable::Disconnector::noop()
    });
    (stream, observers)
}

fn aggregate_log(runtime: &MotionRuntime) -> (Subscription, Rc<RefCell<Vec<MotionState>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let subscription = runtime
        .state()
        .stream()
        .subscribe_fn(move |state| sink.borrow_mut().push(state));
    (subscription, log)
}

#[test]
fn aggregate_is_an_or_gate_over_streams() {
    let runtime = MotionRuntime::default();
    let (a, a_observers) = state_source();
    let (b, b_observers) = state_source();
    runtime.subscribe(&a, Observer::new(|_| {}));
    runtime.subscribe(&b, Observer::new(|_| {}));
    let (_subscription, log) = aggregate_log(&runtime);

    let a = a_observers.borrow()[0].clone();
    let b = b_observers.borrow()[0].clone();
    a.state(MotionState::Active);
    b.state(MotionState::Active);
    a.state(MotionState::Active);
    assert!(runtime.is_active());
    a.state(MotionState::AtRest);
    assert!(runtime.is_active());
    b.state(MotionState::AtRest);
    b.state(MotionState::AtRest);

    assert!(!runtime.is_active());
    assert_eq!(
        *log.borrow(),
        vec![MotionState::AtRest, MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn disconnecting_an_active_stream_settles_the_aggregate() {
    let runtime = MotionRuntime::default();
    let (stream, observers) = state_source();
    let token = runtime.subscribe(&stream, Observer::new(|_| {}));
    observers.borrow()[0].state(MotionState::Active);
    assert!(runtime.is_active());

    runtime.disconnect(token);
    runtime.disconnect(token);

    assert!(!runtime.is_active());
    assert_eq!(runtime.state().read(), MotionState::AtRest);
    assert_eq!(runtime.stream_count(), 0);
}

#[test]
fn write_copies_values_into_property() {
    let runtime = MotionRuntime::default();
    let source = ReactiveProperty::new(1);
    let sink = ReactiveProperty::new(0);

    runtime.write(&source.stream().map(|value| value * 2), &sink);
    assert_eq!(sink.read(), 2);
    source.write(4);
    assert_eq!(sink.read(), 8);

    runtime.disconnect_all();
    source.write(5);
    assert_eq!(sink.read(), 8);
    assert_eq!(source.observer_count(), 0);
}

#[test]
fn start_enables_consumer_on_trigger() {
    let runtime = MotionRuntime::default();
    let producer = Switch {
        controls: crate::interaction::InteractionControls::new(true),
    };
    let consumer = Switch {
        controls: crate::interaction::InteractionControls::new(false),
    };

    runtime.start(&consumer, &producer, MotionState::Active);
    assert!(!consumer.enabled().read());

    producer.controls.state.write(MotionState::Active);
    assert!(consumer.enabled().read());

    consumer.enabled().write(false);
    producer.controls.state.write(MotionState::AtRest);
    assert!(!consumer.enabled().read());
}

#[test]
fn property_cache_returns_the_same_cell() {
    struct Label {
        alpha: std::cell::Cell<f32>,
    }
    struct Alpha;
    impl PropertyAccessor<Label, f32> for Alpha {
        fn name(&self) -> &'static str {
            "alpha"
        }
        fn read(&self, target: &Label) -> f32 {
            target.alpha.get()
        }
        fn write(&self, target: &Label, value: f32) {
            target.alpha.set(value);
        }
    }

    let runtime = MotionRuntime::default();
    let label = Rc::new(Label {
        alpha: std::cell::Cell::new(1.0),
    });
    let first = runtime.property(&label, Alpha);
    let second = runtime.property(&label, Alpha);
    assert!(first.ptr_eq(&second));

    first.write(0.5);
    assert_eq!(label.alpha.get(), 0.5);

    drop(label);
    assert_eq!(runtime.purge_targets(), 1);
    assert_eq!(runtime.target_count(), 0);
}

#[test]
fn add_interaction_registers_and_connects() {
    let runtime = MotionRuntime::default();
    let target = Rc::new(());
    runtime.add_interaction(
        &target,
        Rc::new(Switch {
            controls: crate::interaction::InteractionControls::default(),
        }),
    );

    let switches: Vec<Rc<Switch>> = runtime.interactions_for(&target);
    assert_eq!(switches.len(), 1);
    assert_eq!(runtime.interaction_count(&target), 1);
}
