/// User settings
///
/// Settings are stored as JSON in the user's config directory:
/// - Linux: ~/.config/better-gallery/settings.json
/// - macOS: ~/Library/Application Support/better-gallery/settings.json
/// - Windows: %APPDATA%\better-gallery\settings.json
///
/// A missing file means "use the defaults". Fields missing from an existing
/// file fall back to their default values as well.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const APP_DIR: &str = "better-gallery";
const SETTINGS_FILE: &str = "settings.json";

/// Overrides `photo_root` when set
pub const ROOT_ENV_VAR: &str = "BETTER_GALLERY_ROOT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder whose immediate children are browsed
    pub photo_root: PathBuf,
    /// Catalog location; `None` means the platform data directory
    pub database_path: Option<PathBuf>,
    /// Directories starting with this prefix hold pre-rendered thumbnails
    pub thumbnail_prefix: String,
    /// Accepted file extensions (case-sensitive)
    pub image_extensions: Vec<String>,
    /// Title shown while at the root of the gallery
    pub root_label: String,
    /// Default tracing filter when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            photo_root: default_photo_root(),
            database_path: None,
            thumbnail_prefix: ".thumbnail".to_string(),
            image_extensions: vec!["jpg".to_string(), "png".to_string()],
            root_label: "Photos".to_string(),
            log_filter: "better_gallery=info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, applying the root override
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::settings_path())?.with_env_override())
    }

    /// Apply `BETTER_GALLERY_ROOT`, if set
    pub fn with_env_override(self) -> Self {
        self.with_root_override(std::env::var_os(ROOT_ENV_VAR))
    }

    pub fn with_root_override(mut self, root: Option<OsString>) -> Self {
        if let Some(root) = root.filter(|root| !root.is_empty()) {
            self.photo_root = PathBuf::from(root);
        }
        self
    }

    /// Load settings from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Where the catalog database lives
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            path.push(APP_DIR);
            path.push("gallery.db");
            path
        })
    }

    fn settings_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(SETTINGS_FILE);
        path
    }
}

fn default_photo_root() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.thumbnail_prefix, ".thumbnail");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.photo_root = PathBuf::from("/media/camera");
        settings.root_label = "Camera".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "root_label": "DCIM" }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.root_label, "DCIM");
        assert_eq!(loaded.image_extensions, vec!["jpg", "png"]);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::error::GalleryError::Config(_)));
    }

    #[test]
    fn test_root_override_applies_to_fallback_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();

        // Same recovery as startup: broken file, defaults, then the override
        let settings = Settings::load_from(&path)
            .unwrap_or_default()
            .with_root_override(Some(OsString::from("/media/card")));
        assert_eq!(settings.photo_root, PathBuf::from("/media/card"));
        assert_eq!(settings.root_label, "Photos");
    }

    #[test]
    fn test_root_override_unset_or_empty_keeps_root() {
        let mut settings = Settings::default();
        settings.photo_root = PathBuf::from("/media/camera");

        let kept = settings.clone().with_root_override(None);
        assert_eq!(kept.photo_root, PathBuf::from("/media/camera"));
        let kept = settings.with_root_override(Some(OsString::new()));
        assert_eq!(kept.photo_root, PathBuf::from("/media/camera"));
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let mut settings = Settings::default();
        settings.database_path = Some(PathBuf::from("/tmp/catalog.db"));
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/catalog.db"));
    }
}
