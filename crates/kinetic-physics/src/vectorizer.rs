//! Conversion between typed values and flat `f64` vectors.
//!
//! The spring and tween integrators work on plain component vectors. A
//! [`Vectorizer`] describes how many components a type has and how to move
//! between the typed value and its components.

use kinetic_core::Point;
use smallvec::SmallVec;

use crate::color::{channel, Color, Lab};
use crate::error::SpringError;

/// Component storage used by the integrators.
pub type Vector = SmallVec<[f64; 4]>;

pub trait Vectorizer<T> {
    fn dimensions(&self) -> usize;

    /// Writes the components of `value` into `out`, which has
    /// [`dimensions`](Vectorizer::dimensions) slots.
    fn vectorize(&self, value: &T, out: &mut [f64]);

    fn compose(&self, vector: &[f64]) -> T;

    /// Rejects values that do not fit this vectorizer.
    fn validate(&self, _value: &T) -> Result<(), SpringError> {
        Ok(())
    }

    fn to_vector(&self, value: &T) -> Vector {
        let mut vector: Vector = SmallVec::from_elem(0.0, self.dimensions());
        self.vectorize(value, &mut vector);
        vector
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FloatVectorizer;

impl Vectorizer<f32> for FloatVectorizer {
    fn dimensions(&self) -> usize {
        1
    }

    fn vectorize(&self, value: &f32, out: &mut [f64]) {
        out[0] = f64::from(*value);
    }

    fn compose(&self, vector: &[f64]) -> f32 {
        vector[0] as f32
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct PointVectorizer;

impl Vectorizer<Point> for PointVectorizer {
    fn dimensions(&self) -> usize {
        2
    }

    fn vectorize(&self, value: &Point, out: &mut [f64]) {
        out[0] = f64::from(value.x);
        out[1] = f64::from(value.y);
    }

    fn compose(&self, vector: &[f64]) -> Point {
        Point::new(vector[0] as f32, vector[1] as f32)
    }
}

/// Fixed-length `Vec<f32>` values.
#[derive(Copy, Clone, Debug)]
pub struct FloatArrayVectorizer {
    length: usize,
}

impl FloatArrayVectorizer {
    pub fn new(length: usize) -> Result<Self, SpringError> {
        if length == 0 {
            return Err(SpringError::InvalidLength { length });
        }
        Ok(Self { length })
    }
}

impl Vectorizer<Vec<f32>> for FloatArrayVectorizer {
    fn dimensions(&self) -> usize {
        self.length
    }

    /// Components beyond the value's length stay at zero.
    fn vectorize(&self, value: &Vec<f32>, out: &mut [f64]) {
        out.fill(0.0);
        for (slot, component) in out.iter_mut().zip(value) {
            *slot = f64::from(*component);
        }
    }

    fn compose(&self, vector: &[f64]) -> Vec<f32> {
        vector.iter().map(|component| *component as f32).collect()
    }

    fn validate(&self, value: &Vec<f32>) -> Result<(), SpringError> {
        if value.len() != self.length {
            return Err(SpringError::DimensionMismatch {
                expected: self.length,
                actual: value.len(),
            });
        }
        Ok(())
    }
}

/// Interpolates colors channel by channel in sRGB space.
#[derive(Copy, Clone, Debug, Default)]
pub struct RgbColorVectorizer;

impl Vectorizer<Color> for RgbColorVectorizer {
    fn dimensions(&self) -> usize {
        4
    }

    fn vectorize(&self, value: &Color, out: &mut [f64]) {
        out[0] = f64::from(value.alpha);
        out[1] = f64::from(value.red);
        out[2] = f64::from(value.green);
        out[3] = f64::from(value.blue);
    }

    fn compose(&self, vector: &[f64]) -> Color {
        Color::argb(
            channel(vector[0]),
            channel(vector[1]),
            channel(vector[2]),
            channel(vector[3]),
        )
    }
}

/// Interpolates colors in CIELAB, which keeps perceived lightness even.
#[derive(Copy, Clone, Debug, Default)]
pub struct LabColorVectorizer;

impl Vectorizer<Color> for LabColorVectorizer {
    fn dimensions(&self) -> usize {
        4
    }

    fn vectorize(&self, value: &Color, out: &mut [f64]) {
        let lab = value.to_lab();
        out[0] = lab.alpha;
        out[1] = lab.l;
        out[2] = lab.a;
        out[3] = lab.b;
    }

    fn compose(&self, vector: &[f64]) -> Color {
        Color::from_lab(Lab {
            alpha: vector[0],
            l: vector[1],
            a: vector[2],
            b: vector[3],
        })
    }
}

#[cfg(test)]
#[path = "tests/vectorizer_tests.rs"]
mod tests;
