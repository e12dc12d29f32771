//! Interactions: units of behavior attached to a target.
//!
//! An interaction owns an `enabled` property and reports its own activity on
//! a state stream. The runtime wires interactions together through those two
//! surfaces (see [`MotionRuntime::start`](crate::MotionRuntime::start)).

use crate::observable::{MotionState, Observable};
use crate::property::ReactiveProperty;
use crate::runtime::MotionRuntime;

pub trait Interaction {
    /// Gate for the interaction's streams. Writing `false` stops emission;
    /// writing it again is a no-op.
    fn enabled(&self) -> &ReactiveProperty<bool>;

    /// The interaction's activity; replays the current state on subscribe.
    fn state(&self) -> Observable<MotionState>;

    /// Wires the interaction's streams into `runtime`.
    fn connect(&self, runtime: &MotionRuntime);
}

/// Shared `enabled`/`state` pair most interactions embed.
#[derive(Clone, Debug)]
pub struct InteractionControls {
    pub enabled: ReactiveProperty<bool>,
    pub state: ReactiveProperty<MotionState>,
}

impl InteractionControls {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: ReactiveProperty::new(enabled),
            state: ReactiveProperty::new(MotionState::AtRest),
        }
    }

    /// A dedupe'd view of the state property.
    pub fn state_stream(&self) -> Observable<MotionState> {
        self.state.stream().dedupe()
    }
}

impl Default for InteractionControls {
    fn default() -> Self {
        Self::new(true)
    }
}
