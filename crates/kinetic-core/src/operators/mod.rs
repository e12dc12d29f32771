//! Stateful and stateless operators built on [`Operation`](crate::Operation).
//!
//! Each operator is a small state machine exposed twice: as a free function
//! returning the operation (for use with [`Observable::compose`] or
//! [`Observable::apply`]) and as a method on [`Observable`].
//!
//! [`Observable`]: crate::Observable
//! [`Observable::compose`]: crate::Observable::compose
//! [`Observable::apply`]: crate::Observable::apply

pub mod bounds;
pub mod dedupe;
pub mod delay;
pub mod gate;
pub mod ignore_until;
pub mod remember;
pub mod rewrite;
pub mod slop;
pub mod threshold;

pub use bounds::{lower_bound, offset_by, scaled_by, upper_bound};
pub use dedupe::{dedupe, Dedupe};
pub use delay::Delay;
pub use ignore_until::{ignore_until, IgnoreUntil};
pub use remember::RememberHandle;
pub use rewrite::{rewrite, rewrite_to, Rewrite};
pub use slop::SlopEvent;
pub use threshold::{threshold, threshold_range, Threshold, ThresholdRange, ThresholdSide};
