//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Slowest allowed orbital speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;
/// Fastest allowed orbital speed multiplier.
pub const MAX_SPEED_MULTIPLIER: f32 = 5.0;

const CONFIG_FILE: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Simulation pacing.
    pub sim: SimConfig,
    /// Camera projection and controls.
    pub camera: CameraConfig,
    /// Pointer interaction with planet surfaces.
    pub interaction: InteractionConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Base window title. The HUD appends mission time and focus info.
    pub title: String,
}

/// When the thin orbit rings are drawn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrbitLineMode {
    /// Only while the system is paused and easing back to alignment.
    #[default]
    WhilePaused,
    /// Only while the planets are orbiting.
    WhileRunning,
    Always,
    Never,
}

impl OrbitLineMode {
    /// Whether orbit lines are visible given the current run state.
    pub fn visible(self, running: bool) -> bool {
        match self {
            Self::WhilePaused => !running,
            Self::WhileRunning => running,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of stars baked into the skybox.
    pub star_count: u32,
    /// Seed for star placement.
    pub star_seed: u64,
    /// Number of asteroids in the main belt.
    pub asteroid_count: u32,
    /// Seed for asteroid placement.
    pub asteroid_seed: u64,
    /// Multiplier on every body's point-cloud subdivision detail.
    pub point_detail_scale: f32,
    /// Directory holding planet texture maps. Missing maps are generated.
    pub texture_dir: Option<PathBuf>,
    /// Orbit ring visibility policy.
    pub orbit_lines: OrbitLineMode,
    /// Resolution (width) of procedurally generated surface maps.
    pub procedural_map_width: u32,
}

/// Simulation pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Start with the planets orbiting instead of aligned.
    pub start_running: bool,
    /// Mission start date (`YYYY-MM-DD`). `None` means today.
    pub start_date: Option<String>,
    /// Scales orbital advance while running.
    pub speed_multiplier: f32,
    /// Radians advanced per tick per unit of angular speed.
    pub step_factor: f32,
    /// Fraction of the remaining angle removed per tick while aligning.
    pub align_factor: f32,
    /// Running ticks per simulated day.
    pub frames_per_day: u32,
    /// Per-tick lerp factor for pointer UV and interaction strength.
    pub interaction_smoothing: f32,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Duration of a focus move in seconds.
    pub transition_seconds: f32,
    /// Closest the camera may dolly to its target.
    pub min_distance: f32,
    /// Farthest the camera may dolly from its target.
    pub max_distance: f32,
    /// Radians of orbit per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Fractional distance change per scroll line.
    pub zoom_speed: f32,
}

/// Pointer interaction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Drive interaction strength from hover state instead of holding it at
    /// full strength for every body but Earth.
    pub respect_hover: bool,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse sensitivity multiplier.
    pub mouse_sensitivity: f32,
    /// Invert Y axis for camera drag.
    pub invert_y: bool,
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show FPS in the window title.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            star_count: 5000,
            star_seed: 42,
            asteroid_count: 800,
            asteroid_seed: 7,
            point_detail_scale: 1.0,
            texture_dir: None,
            orbit_lines: OrbitLineMode::default(),
            procedural_map_width: 512,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_running: false,
            start_date: None,
            speed_multiplier: 1.0,
            step_factor: 0.005,
            align_factor: 0.05,
            frames_per_day: 5,
            interaction_smoothing: 0.1,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 2000.0,
            transition_seconds: 1.0,
            min_distance: 2.0,
            max_distance: 100.0,
            orbit_sensitivity: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            invert_y: false,
            keybindings: HashMap::new(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    /// Clamp the speed multiplier into its allowed range.
    pub fn clamp_speed(&mut self) {
        self.speed_multiplier = if self.speed_multiplier.is_finite() {
            self.speed_multiplier
                .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER)
        } else {
            1.0
        };
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Default config directory: `<os config dir>/orrery`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("orrery"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let mut config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.sim.clamp_speed();
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let mut new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.sim.clamp_speed();

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("frames_per_day: 5"));
        assert!(ron_str.contains("WhilePaused"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.sim, SimConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_missing_interaction_section_uses_default() {
        let config: Config = ron::from_str("(sim: (frames_per_day: 3))").unwrap();
        assert_eq!(config.interaction, InteractionConfig::default());
        assert!(!config.interaction.respect_hover);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.sim.start_date = Some("2026-01-23".to_string());
        config.render.orbit_lines = OrbitLineMode::Always;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_load_clamps_speed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.ron"),
            "(sim: (speed_multiplier: 40.0))",
        )
        .unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config.sim.speed_multiplier, MAX_SPEED_MULTIPLIER);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.sim.frames_per_day = 10;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().sim.frames_per_day, 10);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_orbit_line_visibility() {
        assert!(OrbitLineMode::WhilePaused.visible(false));
        assert!(!OrbitLineMode::WhilePaused.visible(true));
        assert!(OrbitLineMode::WhileRunning.visible(true));
        assert!(OrbitLineMode::Always.visible(true));
        assert!(!OrbitLineMode::Never.visible(false));
    }

    #[test]
    fn test_clamp_speed_rejects_nan() {
        let mut sim = SimConfig {
            speed_multiplier: f32::NAN,
            ..SimConfig::default()
        };
        sim.clamp_speed();
        assert_eq!(sim.speed_multiplier, 1.0);

        sim.speed_multiplier = 0.0;
        sim.clamp_speed();
        assert_eq!(sim.speed_multiplier, MIN_SPEED_MULTIPLIER);
    }
}
