//! Fixed-step spring integration over component vectors.
//!
//! State is kept in `f64`; values are narrowed only when composed.

use smallvec::SmallVec;

use crate::error::SpringError;
use crate::origami::SpringCoefficients;
use crate::rk4::{rk4_step, Phase};
use crate::vectorizer::Vector;

/// Solver step in seconds.
pub const SOLVER_TIMESTEP_SECS: f64 = 0.001;

/// Longest frame interval simulated in one go. Longer gaps (a stalled host,
/// a breakpoint) are treated as this long.
pub const MAX_FRAME_DELTA_SECS: f64 = 0.064;

/// Advances every component of a vector toward its destination under a
/// unit-mass spring, in fixed [`SOLVER_TIMESTEP_SECS`] steps.
///
/// Leftover frame time is carried to the next [`advance`](Self::advance).
#[derive(Clone, Debug)]
pub struct SpringIntegrator {
    coefficients: SpringCoefficients,
    threshold: f64,
    position: Vector,
    velocity: Vector,
    destination: Vector,
    accumulator: f64,
}

fn check(expected: usize, vector: &[f64]) -> Result<(), SpringError> {
    if vector.len() != expected {
        return Err(SpringError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

impl SpringIntegrator {
    pub fn new(
        coefficients: SpringCoefficients,
        threshold: f32,
        position: &[f64],
        velocity: &[f64],
        destination: &[f64],
    ) -> Result<Self, SpringError> {
        check(position.len(), velocity)?;
        check(position.len(), destination)?;
        Ok(Self {
            coefficients,
            threshold: f64::from(threshold),
            position: SmallVec::from_slice(position),
            velocity: SmallVec::from_slice(velocity),
            destination: SmallVec::from_slice(destination),
            accumulator: 0.0,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.position.len()
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn destination(&self) -> &[f64] {
        &self.destination
    }

    pub fn coefficients(&self) -> SpringCoefficients {
        self.coefficients
    }

    pub fn set_coefficients(&mut self, coefficients: SpringCoefficients) {
        self.coefficients = coefficients;
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = f64::from(threshold);
    }

    pub fn set_destination(&mut self, destination: &[f64]) -> Result<(), SpringError> {
        check(self.dimensions(), destination)?;
        self.destination.copy_from_slice(destination);
        Ok(())
    }

    pub fn set_velocity(&mut self, velocity: &[f64]) -> Result<(), SpringError> {
        check(self.dimensions(), velocity)?;
        self.velocity.copy_from_slice(velocity);
        Ok(())
    }

    /// Restarts from `position` at rest, dropping carried frame time.
    pub fn reset(&mut self, position: &[f64]) -> Result<(), SpringError> {
        check(self.dimensions(), position)?;
        self.position.copy_from_slice(position);
        self.velocity.fill(0.0);
        self.accumulator = 0.0;
        Ok(())
    }

    /// Every component is within `threshold` of its destination and moving
    /// slower than `threshold`.
    pub fn is_at_rest(&self) -> bool {
        let threshold = self.threshold;
        self.position
            .iter()
            .zip(&self.destination)
            .zip(&self.velocity)
            .all(|((x, anchor), v)| (x - anchor).abs() <= threshold && v.abs() <= threshold)
    }

    /// Simulates `delta_secs` of motion. Returns `true` once the spring is at
    /// rest, in which case it has been snapped onto its destination.
    pub fn advance(&mut self, delta_secs: f64) -> bool {
        self.accumulator += delta_secs.clamp(0.0, MAX_FRAME_DELTA_SECS);
        while self.accumulator >= SOLVER_TIMESTEP_SECS {
            self.step(SOLVER_TIMESTEP_SECS);
            self.accumulator -= SOLVER_TIMESTEP_SECS;
        }

        if self.is_at_rest() {
            self.position.copy_from_slice(&self.destination);
            self.velocity.fill(0.0);
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    fn step(&mut self, dt: f64) {
        let coefficients = self.coefficients;
        for ((x, v), anchor) in self
            .position
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(&self.destination)
        {
            let next = rk4_step(Phase::new(*x, *v), dt, |position, velocity| {
                coefficients.acceleration(position - anchor, velocity)
            });
            *x = next.position;
            *v = next.velocity;
        }
    }
}

#[cfg(test)]
#[path = "tests/integrator_tests.rs"]
mod tests;
