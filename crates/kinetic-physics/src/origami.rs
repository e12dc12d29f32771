//! Origami-style spring dials.
//!
//! Designers tune springs with "tension" and "friction" dials. These map to
//! physical stiffness and damping through fixed linear formulas; the
//! constants are part of the feel of every spring and must not change.

/// Stiffness `k` for a tension dial value. Zero tension means no spring.
pub fn stiffness_from_tension(tension: f32) -> f32 {
    if tension == 0.0 {
        0.0
    } else {
        (tension - 30.0) * 3.62 + 194.0
    }
}

/// Damping coefficient for a friction dial value.
pub fn damping_from_friction(friction: f32) -> f32 {
    if friction == 0.0 {
        0.0
    } else {
        (friction - 8.0) * 3.0 + 25.0
    }
}

/// Damping ratio of a unit-mass spring with the given stiffness and
/// friction dial. `1.0` is critically damped.
pub fn damping_ratio(stiffness: f32, friction: f32) -> f32 {
    damping_from_friction(friction) / (2.0 * stiffness.sqrt())
}

/// Physical coefficients of a unit-mass spring, widened to the integrator's
/// precision.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SpringCoefficients {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringCoefficients {
    pub fn from_origami(tension: f32, friction: f32) -> Self {
        Self {
            stiffness: f64::from(stiffness_from_tension(tension)),
            damping: f64::from(damping_from_friction(friction)),
        }
    }

    /// Acceleration at `displacement` from the anchor moving at `velocity`.
    pub fn acceleration(&self, displacement: f64, velocity: f64) -> f64 {
        -self.stiffness * displacement - self.damping * velocity
    }
}

#[cfg(test)]
#[path = "tests/origami_tests.rs"]
mod tests;
