#![doc = r"Reactive streams, properties and runtime for driving motion from gestures and simulations."]

pub extern crate self as kinetic_core;

mod collections;
pub mod frame_clock;
pub mod geometry;
pub mod gesture;
pub mod interaction;
pub mod observable;
pub mod operation;
pub mod operators;
pub mod platform;
pub mod property;
mod registry;
pub mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use geometry::Point;
pub use gesture::{
    gesture_source, Draggable, GestureRecognizer, GestureSample, GestureState, ListenerId,
};
pub use interaction::{Interaction, InteractionControls};
pub use observable::{Disconnector, MotionState, Observable, Observer, ObserverId, Subscription};
pub use operation::{filter, map, FilterOperation, MapOperation, Operation};
pub use operators::remember::RememberHandle;
pub use operators::slop::SlopEvent;
pub use operators::threshold::ThresholdSide;
pub use platform::{DefaultScheduler, FrameScheduler};
pub use property::{PropertyAccessor, ReactiveProperty};
pub use runtime::{MotionRuntime, StreamToken};
