use std::rc::Rc;

use kinetic_core::{
    Draggable, GestureRecognizer, Interaction, MotionRuntime, MotionState, Point, ReactiveProperty,
};
use kinetic_physics::{
    Color, FloatArrayVectorizer, FloatVectorizer, LabColorVectorizer, PointVectorizer, Spring,
};
use kinetic_testing::{init_logging, FakeRecognizer, FrameDriver, Recorder};

fn float_spring(value: f32) -> Spring<f32> {
    Spring::new(ReactiveProperty::new(value), FloatVectorizer).expect("valid spring")
}

#[test]
fn settles_on_destination_with_one_activity_pair() {
    init_logging();
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);
    spring.destination().write(10.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    driver.run_until_idle(200);

    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
    assert_eq!(recorder.last_value(), Some(10.0));

    // Default dials are over-damped: no overshoot from rest.
    let values = recorder.values();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{values:?}");
    assert!(values.iter().all(|value| *value <= 10.0));
}

#[test]
fn settles_exactly_on_large_destinations() {
    for destination in [100.0, 1000.0] {
        let driver = FrameDriver::new();
        let spring = float_spring(0.0);
        spring.destination().write(destination);

        let recorder = Recorder::new();
        let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
        driver.run_until_idle(300);

        assert_eq!(recorder.last_value(), Some(destination));
        assert_eq!(
            recorder.states(),
            vec![MotionState::Active, MotionState::AtRest]
        );
    }
}

#[test]
fn tension_change_mid_flight_keeps_the_motion_continuous() {
    init_logging();
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);
    spring.destination().write(100.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    for _ in 0..6 {
        driver.advance_frame();
    }
    let values = recorder.values();
    let [.., previous, last] = values[..] else {
        panic!("spring emitted {values:?}");
    };
    let step_before = last - previous;

    spring.tension().write(100.0);
    assert_eq!(recorder.values().len(), values.len());
    driver.advance_frame();
    let next = recorder.last_value().expect("spring kept moving");
    let step_after = next - last;
    assert!(step_after > 0.0, "{step_after}");
    assert!(step_after <= step_before, "{step_after} > {step_before}");

    driver.run_until_idle(400);
    let values = recorder.values();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{values:?}");
    assert_eq!(recorder.last_value(), Some(100.0));
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn writes_of_the_wrong_length_are_ignored() {
    let driver = FrameDriver::new();
    let vectorizer = FloatArrayVectorizer::new(2).expect("valid length");
    let spring =
        Spring::new(ReactiveProperty::new(vec![0.0, 0.0]), vectorizer).expect("valid spring");

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());

    spring.destination().write(vec![5.0, 5.0, 5.0]);
    spring.initial_velocity().write(vec![10.0]);
    assert!(recorder.is_empty());
    assert!(driver.is_idle());

    spring.destination().write(vec![5.0, -5.0]);
    driver.run_until_idle(300);
    assert_eq!(recorder.last_value(), Some(vec![5.0, -5.0]));
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn stream_leaves_the_target_alone() {
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);
    spring.destination().write(3.0);

    let _subscription = spring.stream(driver.clock()).subscribe_fn(|_| {});
    driver.run_until_idle(200);

    assert_eq!(spring.target().read(), 0.0);
}

#[test]
fn spring_at_rest_reports_nothing() {
    let driver = FrameDriver::new();
    let spring = float_spring(5.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());

    assert!(recorder.is_empty());
    assert!(driver.is_idle());
}

#[test]
fn retargeting_mid_flight_continues_the_motion() {
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);
    spring.destination().write(10.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    for _ in 0..6 {
        driver.advance_frame();
    }
    let before = recorder.values().len();
    let position = recorder.last_value().expect("spring moved");
    assert!(position > 0.0 && position < 10.0);

    spring.destination().write(-10.0);
    driver.advance_frame();
    assert_eq!(recorder.values().len(), before + 1);
    assert_ne!(recorder.last_value(), Some(0.0));

    driver.run_until_idle(300);
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
    assert_eq!(recorder.last_value(), Some(-10.0));
}

#[test]
fn new_destination_after_rest_restarts() {
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);
    spring.destination().write(1.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    driver.run_until_idle(200);

    spring.tension().write(100.0);
    assert!(driver.is_idle());

    spring.destination().write(2.0);
    driver.run_until_idle(400);

    assert_eq!(
        recorder.states(),
        vec![
            MotionState::Active,
            MotionState::AtRest,
            MotionState::Active,
            MotionState::AtRest
        ]
    );
    assert_eq!(recorder.last_value(), Some(2.0));
}

#[test]
fn velocity_kick_at_rest_swings_back() {
    let driver = FrameDriver::new();
    let spring = float_spring(0.0);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    spring.initial_velocity().write(50.0);
    driver.run_until_idle(300);

    let values = recorder.values();
    assert!(values.iter().any(|value| *value > 0.1), "{values:?}");
    assert_eq!(recorder.last_value(), Some(0.0));
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn disabled_spring_does_not_write() {
    let driver = FrameDriver::new();
    let runtime = MotionRuntime::new(driver.clock().clone());
    let spring = float_spring(0.0);
    spring.enabled().write(false);
    spring.connect(&runtime);

    spring.destination().write(4.0);
    assert!(driver.is_idle());
    assert_eq!(spring.target().read(), 0.0);
    assert!(!runtime.is_active());

    spring.enabled().write(true);
    assert!(runtime.is_active());
    driver.run_until_idle(200);

    assert_eq!(spring.target().read(), 4.0);
    assert!(!runtime.is_active());
}

#[test]
fn release_of_a_drag_hands_off_to_the_spring() {
    init_logging();
    let driver = FrameDriver::new();
    let runtime = MotionRuntime::new(driver.clock().clone());
    let position = ReactiveProperty::new(Point::new(0.0, 0.0));

    let recognizer = FakeRecognizer::new();
    let erased: Rc<dyn GestureRecognizer> = recognizer.clone();
    let draggable = Draggable::new(erased, position.clone());
    let spring = Spring::new(position.clone(), PointVectorizer).expect("valid spring");

    draggable.connect(&runtime);
    spring.connect(&runtime);
    runtime.write(
        &draggable.state().rewrite([(MotionState::Active, false)]),
        spring.enabled(),
    );
    runtime.start(&spring, &draggable, MotionState::AtRest);

    recognizer.begin();
    assert!(!spring.enabled().read());
    recognizer.change(Point::new(50.0, 20.0));
    assert_eq!(position.read(), Point::new(50.0, 20.0));

    let states = Recorder::new();
    let _watch = spring.state().subscribe(states.observer());
    recognizer.recognize(Point::new(0.0, 0.0));
    assert!(spring.enabled().read());
    assert!(runtime.is_active());

    driver.run_until_idle(300);
    assert_eq!(position.read(), Point::new(0.0, 0.0));
    assert!(!runtime.is_active());
    assert_eq!(
        states.values(),
        vec![MotionState::AtRest, MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn colors_travel_through_lab() {
    let driver = FrameDriver::new();
    let spring =
        Spring::new(ReactiveProperty::new(Color::WHITE), LabColorVectorizer).expect("valid spring");
    spring.destination().write(Color::BLACK);

    let recorder = Recorder::new();
    let _subscription = spring.stream(driver.clock()).subscribe(recorder.observer());
    driver.run_until_idle(300);

    assert_eq!(recorder.last_value(), Some(Color::BLACK));
    for color in recorder.values() {
        assert_eq!(color.alpha, 255);
        let spread = color.red.max(color.green).max(color.blue)
            - color.red.min(color.green).min(color.blue);
        assert!(spread <= 2, "{color:?} is not gray");
    }
}
