pub mod app;
pub mod audio;
pub mod config;
pub mod game;
pub mod model;
pub mod stats;
pub mod traits;
pub mod util;
