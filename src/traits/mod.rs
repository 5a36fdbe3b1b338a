//! Seams between the game core and the outside world.

pub mod audio;
pub mod input;
pub mod time;

pub use audio::{AudioSink, MockAudio, NullAudio};
pub use input::{InputEvent, InputSource, ScriptedInput};
pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};
