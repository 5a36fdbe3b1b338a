// Notes, clefs and staff geometry.

pub mod note;

pub use note::{Clef, ClefMode, NOTE_COUNT, Note, NoteName, staff_position};
