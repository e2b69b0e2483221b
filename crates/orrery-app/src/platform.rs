//! Per-user directories for config, logs, and optional texture packs.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const APP_NAME: &str = "orrery";

/// Subdirectory of the data dir searched for planet maps.
pub const TEXTURE_SUBDIR: &str = "textures";

/// Platform-appropriate locations (XDG on Linux, Known Folders on Windows,
/// Library on macOS).
#[derive(Clone, Debug)]
pub struct PlatformDirs {
    /// `config.ron` lives here.
    pub config_dir: PathBuf,
    /// Drop a `textures/` folder here to replace the procedural maps.
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve without touching the disk.
    ///
    /// # Errors
    ///
    /// [`PlatformError::NoConfigDir`] if the OS exposes no config directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.join("data"));
        let cache_dir = dirs::cache_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.join("cache"));
        let log_dir = config_dir.join("logs");
        Ok(Self {
            config_dir,
            data_dir,
            cache_dir,
            log_dir,
        })
    }

    /// Resolve and create every directory.
    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Everything under `root`, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            data_dir: app_dir.join("data"),
            cache_dir: app_dir.join("cache"),
            log_dir: app_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [
            &self.config_dir,
            &self.data_dir,
            &self.cache_dir,
            &self.log_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// The user texture folder, if one has been installed.
    pub fn texture_dir(&self) -> Option<PathBuf> {
        let dir = self.data_dir.join(TEXTURE_SUBDIR);
        dir.is_dir().then_some(dir)
    }
}

/// Texture folder to load maps from: the configured one wins, then the
/// per-user data folder. `None` means procedural maps only.
pub fn texture_dir(configured: Option<&Path>, dirs: Option<&PlatformDirs>) -> Option<PathBuf> {
    match configured {
        Some(dir) => Some(dir.to_path_buf()),
        None => dirs.and_then(PlatformDirs::texture_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        assert!(dirs.config_dir.starts_with(tmp.path()));
        assert!(dirs.config_dir.ends_with("config"));
        assert!(dirs.log_dir.ends_with("logs"));
        assert_ne!(dirs.data_dir, dirs.cache_dir);
    }

    #[test]
    fn test_create_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.data_dir.is_dir());
        assert!(dirs.cache_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_texture_dir_only_when_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert_eq!(dirs.texture_dir(), None);

        std::fs::create_dir_all(dirs.data_dir.join(TEXTURE_SUBDIR)).unwrap();
        assert_eq!(dirs.texture_dir(), Some(dirs.data_dir.join(TEXTURE_SUBDIR)));
    }

    #[test]
    fn test_configured_texture_dir_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        std::fs::create_dir_all(dirs.data_dir.join(TEXTURE_SUBDIR)).unwrap();

        let configured = tmp.path().join("maps");
        assert_eq!(
            texture_dir(Some(&configured), Some(&dirs)),
            Some(configured.clone())
        );
        assert_eq!(
            texture_dir(None, Some(&dirs)),
            Some(dirs.data_dir.join(TEXTURE_SUBDIR))
        );
        assert_eq!(texture_dir(None, None), None);
    }

    #[test]
    fn test_platform_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
    }
}
