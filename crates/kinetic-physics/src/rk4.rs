//! Fourth-order Runge-Kutta for second-order systems `x'' = a(x, v)`.

/// Position and velocity of one degree of freedom.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Phase {
    pub position: f64,
    pub velocity: f64,
}

impl Phase {
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

/// Advances `phase` by `dt` seconds under `acceleration(position, velocity)`.
pub fn rk4_step(phase: Phase, dt: f64, acceleration: impl Fn(f64, f64) -> f64) -> Phase {
    let Phase { position, velocity } = phase;
    let half = dt * 0.5;

    let k1x = velocity;
    let k1v = acceleration(position, velocity);

    let k2x = velocity + k1v * half;
    let k2v = acceleration(position + k1x * half, k2x);

    let k3x = velocity + k2v * half;
    let k3v = acceleration(position + k2x * half, k3x);

    let k4x = velocity + k3v * dt;
    let k4v = acceleration(position + k3x * dt, k4x);

    let sixth = dt / 6.0;
    Phase {
        position: position + sixth * (k1x + 2.0 * (k2x + k3x) + k4x),
        velocity: velocity + sixth * (k1v + 2.0 * (k2v + k3v) + k4v),
    }
}

#[cfg(test)]
#[path = "tests/rk4_tests.rs"]
mod tests;
