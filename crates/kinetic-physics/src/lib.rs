#![doc = r"Spring physics, tweens and value vectorizers for Kinetic."]

pub mod color;
pub mod easing;
mod error;
mod frame_loop;
pub mod integrator;
pub mod origami;
pub mod rk4;
pub mod spring;
pub mod tween;
pub mod vectorizer;

pub use color::{Color, Lab};
pub use easing::Easing;
pub use error::SpringError;
pub use integrator::{SpringIntegrator, MAX_FRAME_DELTA_SECS, SOLVER_TIMESTEP_SECS};
pub use origami::{damping_from_friction, damping_ratio, stiffness_from_tension, SpringCoefficients};
pub use rk4::{rk4_step, Phase};
pub use spring::{Spring, SpringConfig};
pub use tween::{Tween, TweenSpec};
pub use vectorizer::{
    FloatArrayVectorizer, FloatVectorizer, LabColorVectorizer, PointVectorizer,
    RgbColorVectorizer, Vector, Vectorizer,
};
