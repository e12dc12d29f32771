use super::*;

use crate::vectorizer::{FloatArrayVectorizer, FloatVectorizer};

#[test]
fn default_config_uses_origami_defaults() {
    let config = SpringConfig::default();
    assert_eq!(config.tension, 342.0);
    assert_eq!(config.friction, 30.0);
    assert_eq!(config.threshold, 0.001);
    assert!(config.damping_ratio() > 1.0);
    assert!(SpringConfig::bouncy().damping_ratio() < 1.0);
}

#[test]
fn builders_replace_single_fields() {
    let config = SpringConfig::default()
        .with_tension(100.0)
        .with_friction(10.0)
        .with_threshold(0.5);
    assert_eq!(config, SpringConfig {
        tension: 100.0,
        friction: 10.0,
        threshold: 0.5,
    });
}

#[test]
fn spring_rests_at_the_target_value() {
    let target = ReactiveProperty::new(4.0_f32);
    let spring = Spring::new(target, FloatVectorizer).expect("valid spring");
    assert_eq!(spring.destination().read(), 4.0);
    assert_eq!(spring.initial_velocity().read(), 0.0);
    assert!(spring.initial_value().ptr_eq(spring.target()));
    assert!(spring.enabled().read());
}

#[test]
fn construction_rejects_mismatched_values() {
    let target = ReactiveProperty::new(vec![1.0_f32, 2.0]);
    let vectorizer = FloatArrayVectorizer::new(3).expect("valid length");
    let error = Spring::new(target, vectorizer).err();
    assert_eq!(
        error,
        Some(SpringError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn stream_steps_on_frames_until_settled() {
    let clock = FrameClock::default();
    let target = ReactiveProperty::new(0.0_f32);
    let spring = Spring::new(target, FloatVectorizer).expect("valid spring");
    spring.destination().write(1.0);

    let values = Rc::new(RefCell::new(Vec::new()));
    let states = Rc::new(RefCell::new(Vec::new()));
    let _subscription = {
        let values = Rc::clone(&values);
        let states = Rc::clone(&states);
        spring.stream(&clock).subscribe_with_state(
            move |value| values.borrow_mut().push(value),
            move |state| states.borrow_mut().push(state),
        )
    };
    assert_eq!(*states.borrow(), vec![MotionState::Active]);

    let mut time = 0;
    while clock.has_frame_callbacks() {
        time += 16_000_000;
        clock.drain_frame_callbacks(time);
        assert!(time < 10_000_000_000, "spring did not settle");
    }

    assert_eq!(values.borrow().last().copied(), Some(1.0));
    assert_eq!(
        *states.borrow(),
        vec![MotionState::Active, MotionState::AtRest]
    );
}

#[test]
fn initial_value_must_match_the_vectorizer() {
    let target = ReactiveProperty::new(vec![1.0_f32, 2.0]);
    let vectorizer = FloatArrayVectorizer::new(2).expect("valid length");
    let spring = Spring::new(target, vectorizer).expect("valid spring");
    let error = spring
        .with_initial_value(ReactiveProperty::new(vec![0.0, 0.0, 0.0]))
        .err();
    assert_eq!(
        error,
        Some(SpringError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    );
}
