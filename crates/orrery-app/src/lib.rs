//! The orrery viewer: window, frame loop, and scene assembly.

pub mod game_loop;
pub mod hud;
pub mod platform;
pub mod scene;
pub mod window;

pub use window::{AppState, run};
