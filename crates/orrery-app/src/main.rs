//! `orrery`: an interactive 3D model of the solar system.
//!
//! Configuration is loaded from `config.ron` in the user config directory
//! and can be overridden on the command line, e.g. `orrery --width 1920`.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::platform::{self, PlatformDirs};
use orrery_config::{CliArgs, Config};
use orrery_space::TextureSource;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = PlatformDirs::resolve_and_create()
        .inspect_err(|e| eprintln!("Failed to prepare user directories: {e}"))
        .ok();
    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs.as_ref().map(|d| d.config_dir.clone()));

    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs.as_ref().map(|d| d.log_dir.clone());
    orrery_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    let texture_dir = platform::texture_dir(config.render.texture_dir.as_deref(), dirs.as_ref());
    match &texture_dir {
        Some(dir) => info!("Loading planet maps from {}", dir.display()),
        None => info!("No texture folder found, using procedural maps"),
    }
    let textures = TextureSource::new(texture_dir, config.render.procedural_map_width);

    if let Err(e) = orrery_app::run(config, textures) {
        error!("Event loop failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
