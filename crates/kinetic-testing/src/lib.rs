//! Testing utilities and harness for Kinetic

pub mod recognizer;
pub mod recorder;
pub mod source;
pub mod testing;

pub use recognizer::FakeRecognizer;
pub use recorder::{Event, Recorder};
pub use source::TrackedSource;
pub use testing::*;

pub mod prelude {
    pub use crate::recognizer::FakeRecognizer;
    pub use crate::recorder::{Event, Recorder};
    pub use crate::source::TrackedSource;
    pub use crate::testing::*;
}
