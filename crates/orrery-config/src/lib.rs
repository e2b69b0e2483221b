//! Configuration system for the orrery.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Missing fields fall back to defaults so older config files
//! keep loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, InputConfig, InteractionConfig, OrbitLineMode,
    RenderConfig, SimConfig, WindowConfig, MAX_SPEED_MULTIPLIER, MIN_SPEED_MULTIPLIER,
};
pub use error::ConfigError;
