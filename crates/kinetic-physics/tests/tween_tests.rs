use kinetic_core::{Interaction, MotionRuntime, MotionState, ReactiveProperty};
use kinetic_physics::{Easing, FloatVectorizer, Tween, TweenSpec};
use kinetic_testing::{init_logging, FrameDriver, Recorder};

fn tween(spec: TweenSpec) -> Tween<f32> {
    Tween::new(ReactiveProperty::new(0.0), FloatVectorizer, spec).expect("valid tween")
}

#[test]
fn linear_tween_reaches_destination_on_time() {
    init_logging();
    let driver = FrameDriver::new();
    let tween = tween(TweenSpec::linear(100));
    tween.destination().write(100.0);

    let recorder = Recorder::new();
    let _subscription = tween.stream(driver.clock()).subscribe(recorder.observer());
    let frames = driver.run_until_idle(20);

    // One frame to start the clock, six to cover 100ms.
    assert_eq!(frames, 7);
    let values = recorder.values();
    assert_eq!(values.first().copied(), Some(0.0));
    assert_eq!(values.last().copied(), Some(100.0));
    assert!((values[3] - 50.0).abs() < 0.01, "{values:?}");
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn eased_tween_stays_within_range() {
    let driver = FrameDriver::new();
    let tween = tween(TweenSpec::millis(200, Easing::FastOutSlowIn));
    tween.destination().write(1.0);

    let recorder = Recorder::new();
    let _subscription = tween.stream(driver.clock()).subscribe(recorder.observer());
    driver.run_until_idle(30);

    let values = recorder.values();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    // Fast out: the first half covers more than half of the distance.
    let halfway = values[values.len() / 2];
    assert!(halfway > 0.5, "{values:?}");
    assert_eq!(recorder.last_value(), Some(1.0));
}

#[test]
fn delay_holds_the_start_value() {
    let driver = FrameDriver::new();
    let tween = tween(TweenSpec::linear(50).with_delay_millis(50));
    tween.destination().write(10.0);

    let recorder = Recorder::new();
    let _subscription = tween.stream(driver.clock()).subscribe(recorder.observer());
    for _ in 0..3 {
        driver.advance_frame();
    }
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.states(), vec![MotionState::Active]);

    driver.run_until_idle(20);
    assert_eq!(recorder.last_value(), Some(10.0));
}

#[test]
fn new_destination_restarts_from_the_current_value() {
    let driver = FrameDriver::new();
    let tween = tween(TweenSpec::linear(100));
    tween.destination().write(100.0);

    let recorder = Recorder::new();
    let _subscription = tween.stream(driver.clock()).subscribe(recorder.observer());
    for _ in 0..4 {
        driver.advance_frame();
    }
    let reached = recorder.last_value().expect("tween moved");

    tween.destination().write(0.0);
    driver.advance_frame();
    assert_eq!(recorder.last_value(), Some(reached));

    driver.run_until_idle(20);
    assert_eq!(recorder.last_value(), Some(0.0));
    assert_eq!(
        recorder.states(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn runtime_tween_writes_its_target() {
    let driver = FrameDriver::new();
    let runtime = MotionRuntime::new(driver.clock().clone());
    let tween = tween(TweenSpec::linear(50));
    tween.connect(&runtime);

    tween.destination().write(8.0);
    assert!(runtime.is_active());
    driver.run_until_idle(20);

    assert_eq!(tween.target().read(), 8.0);
    assert!(!runtime.is_active());
}
