use super::*;

#[test]
fn progress_waits_for_the_delay() {
    let spec = TweenSpec::linear(100).with_delay_millis(50);
    assert_eq!(spec.progress(10_000_000), None);
    assert_eq!(spec.progress(50_000_000), Some((0.0, false)));
    assert_eq!(spec.progress(100_000_000), Some((0.5, false)));
    assert_eq!(spec.progress(150_000_000), Some((1.0, true)));
    assert_eq!(spec.progress(900_000_000), Some((1.0, true)));
}

#[test]
fn zero_duration_finishes_immediately() {
    let spec = TweenSpec::linear(0);
    assert_eq!(spec.progress(1), Some((1.0, true)));
}

#[test]
fn default_spec_is_material_standard() {
    let spec = TweenSpec::default();
    assert_eq!(spec.duration_nanos, 300_000_000);
    assert_eq!(spec.easing, Easing::FastOutSlowIn);
    assert_eq!(spec.delay_nanos, 0);
}
