//! Easing curves for tweens.

/// Maps linear progress in `[0, 1]` onto eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    #[default]
    FastOutSlowIn,
    LinearOutSlowIn,
    FastOutLinearIn,
    /// Custom curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    pub fn transform(&self, fraction: f32) -> f32 {
        match *self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, fraction),
        }
    }
}

/// Polynomial coefficients of one axis of a unit cubic bezier.
#[derive(Clone, Copy)]
struct Axis {
    a: f32,
    b: f32,
    c: f32,
}

impl Axis {
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self { a: 1.0 - c - b, b, c }
    }

    fn sample(self, t: f32) -> f32 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    fn slope(self, t: f32) -> f32 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }
}

const TOLERANCE: f32 = 1e-6;

/// Solves the curve for `x = fraction` and returns its `y`.
///
/// Newton's method first; bisection when the slope flattens out.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }
    let x = Axis::new(x1, x2);
    let y = Axis::new(y1, y2);

    let mut t = fraction;
    for _ in 0..8 {
        let error = x.sample(t) - fraction;
        if error.abs() < TOLERANCE {
            return y.sample(t);
        }
        let slope = x.slope(t);
        if slope.abs() < TOLERANCE {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    t = fraction;
    for _ in 0..24 {
        let error = x.sample(t) - fraction;
        if error.abs() < TOLERANCE {
            break;
        }
        if error > 0.0 {
            high = t;
        } else {
            low = t;
        }
        t = 0.5 * (low + high);
    }
    y.sample(t)
}

#[cfg(test)]
#[path = "tests/easing_tests.rs"]
mod tests;
