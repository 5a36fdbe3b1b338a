//! Glue between input sources, sessions and the terminal.

pub mod controller;
pub mod terminal;

pub use controller::{Flow, GameController, TrainingController};
pub use terminal::{StdinInput, render_game, render_training};
