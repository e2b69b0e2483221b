//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Interactive solar system")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Orbital speed multiplier (0.1 - 5.0).
    #[arg(long)]
    pub speed: Option<f32>,

    /// Start with the planets orbiting.
    #[arg(long)]
    pub run: bool,

    /// Mission start date, `YYYY-MM-DD`.
    #[arg(long)]
    pub start_date: Option<String>,

    /// Directory containing planet texture maps.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(speed) = args.speed {
            self.sim.speed_multiplier = speed;
            self.sim.clamp_speed();
        }
        if args.run {
            self.sim.start_running = true;
        }
        if let Some(ref date) = args.start_date {
            self.sim.start_date = Some(date.clone());
        }
        if let Some(ref dir) = args.textures {
            self.render.texture_dir = Some(dir.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            run: true,
            start_date: Some("2026-01-23".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert!(config.sim.start_running);
        assert_eq!(config.sim.start_date.as_deref(), Some("2026-01-23"));
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_speed_is_clamped() {
        let mut config = Config::default();
        let args = CliArgs {
            speed: Some(0.01),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.sim.speed_multiplier, crate::MIN_SPEED_MULTIPLIER);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["orrery", "--run", "--speed", "2.5", "--width", "800"]);
        assert!(args.run);
        assert_eq!(args.speed, Some(2.5));
        assert_eq!(args.width, Some(800));
    }
}
