use super::*;

const CURVES: [Easing; 7] = [
    Easing::Linear,
    Easing::EaseIn,
    Easing::EaseOut,
    Easing::EaseInOut,
    Easing::FastOutSlowIn,
    Easing::LinearOutSlowIn,
    Easing::FastOutLinearIn,
];

#[test]
fn curves_pin_their_endpoints() {
    for curve in CURVES {
        assert_eq!(curve.transform(0.0), 0.0, "{curve:?}");
        assert_eq!(curve.transform(1.0), 1.0, "{curve:?}");
        assert_eq!(curve.transform(-1.0), 0.0, "{curve:?}");
        assert_eq!(curve.transform(2.0), 1.0, "{curve:?}");
    }
}

#[test]
fn curves_are_monotonic() {
    for curve in CURVES {
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = curve.transform(step as f32 / 100.0);
            assert!(value + 1e-4 >= previous, "{curve:?} at {step}");
            previous = value;
        }
    }
}

#[test]
fn ease_in_out_is_symmetric() {
    let early = Easing::EaseInOut.transform(0.25);
    let late = Easing::EaseInOut.transform(0.75);
    assert!((early + late - 1.0).abs() < 1e-3);
    assert!((Easing::EaseInOut.transform(0.5) - 0.5).abs() < 1e-3);
}

#[test]
fn custom_bezier_matches_named_curve() {
    let custom = Easing::CubicBezier {
        x1: 0.4,
        y1: 0.0,
        x2: 0.2,
        y2: 1.0,
    };
    assert_eq!(custom.transform(0.3), Easing::FastOutSlowIn.transform(0.3));
}
