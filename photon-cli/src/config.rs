//! User settings persisted as JSON under `~/.config/photon/`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

/// Most recent first; older entries fall off.
pub const MAX_RECENT_FILES: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "clamped_quality")]
    pub default_quality: u8,
    pub default_format: String,
    pub last_input_dir: PathBuf,
    pub last_output_dir: PathBuf,
    pub output_dir: PathBuf,
    pub recent_files: Vec<PathBuf>,
    pub favorite_formats: Vec<String>,
    pub show_hidden_files: bool,
    pub confirm_overwrite: bool,
    pub preserve_originals: bool,
}

impl Default for Config {
    fn default() -> Self {
        let home = home_dir();
        Self {
            default_quality: photon::DEFAULT_QUALITY,
            default_format: "webp".to_string(),
            last_input_dir: home.clone(),
            last_output_dir: home,
            output_dir: default_output_dir(),
            recent_files: Vec::new(),
            favorite_formats: ["webp", "avif", "jpg", "png"]
                .into_iter()
                .map(String::from)
                .collect(),
            show_hidden_files: false,
            confirm_overwrite: true,
            preserve_originals: false,
        }
    }
}

/// Out-of-range qualities are clamped to 1..=100 rather than rejected.
fn clamped_quality<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let quality = i64::deserialize(deserializer)?;
    Ok(quality.clamp(1, 100) as u8)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_output_dir() -> PathBuf {
    home_dir().join("Downloads").join("photon")
}

/// `~/.config/photon`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("photon")
}

/// `~/.config/photon/config.json`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Where the TUI writes its log.
pub fn log_path() -> PathBuf {
    config_dir().join("photon.log")
}

impl Config {
    /// Load from the default location. A missing file gives the defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default settings: {e:#}");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading config: {}", path.display()));
            }
        };

        serde_json::from_str(&data).with_context(|| format!("parsing config: {}", path.display()))
    }

    /// Save to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    /// Write pretty-printed JSON, creating the directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory: {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("writing config: {}", path.display()))
    }

    /// Put `path` at the front of the recent list.
    pub fn add_recent_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.recent_files.retain(|p| *p != path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Create the output directory, restoring the default if it was cleared.
    pub fn ensure_output_dir(&mut self) -> anyhow::Result<&Path> {
        if self.output_dir.as_os_str().is_empty() {
            self.output_dir = default_output_dir();
        }
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating directory: {}", self.output_dir.display()))?;
        Ok(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.default_quality, 95);
        assert_eq!(config.default_format, "webp");
        assert_eq!(config.favorite_formats, ["webp", "avif", "jpg", "png"]);
        assert!(config.output_dir.ends_with("Downloads/photon"));
        assert!(config.recent_files.is_empty());
        assert!(!config.show_hidden_files);
        assert!(config.confirm_overwrite);
        assert!(!config.preserve_originals);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.default_quality = 70;
        config.default_format = "avif".into();
        config.add_recent_file("/tmp/a.png");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn uses_snake_case_keys() {
        let json = serde_json::to_value(Config::default()).unwrap();
        for key in [
            "default_quality",
            "default_format",
            "last_input_dir",
            "last_output_dir",
            "output_dir",
            "recent_files",
            "favorite_formats",
            "show_hidden_files",
            "confirm_overwrite",
            "preserve_originals",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_format": "png"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_format, "png");
        assert_eq!(config.default_quality, 95);
        assert!(config.confirm_overwrite);
    }

    #[test]
    fn quality_is_clamped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_quality": 0}"#).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().default_quality, 1);

        std::fs::write(&path, r#"{"default_quality": -7}"#).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().default_quality, 1);
    }

    #[test]
    fn oversized_quality_is_clamped_and_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_quality": 300, "default_format": "png"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_quality, 100);
        assert_eq!(config.default_format, "png");
    }

    #[test]
    fn malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn recent_files_dedup_and_cap() {
        let mut config = Config::default();
        for i in 0..12 {
            config.add_recent_file(format!("/img/{i}.png"));
        }
        assert_eq!(config.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(config.recent_files[0], PathBuf::from("/img/11.png"));

        config.add_recent_file("/img/5.png");
        assert_eq!(config.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(config.recent_files[0], PathBuf::from("/img/5.png"));
        assert_eq!(
            config
                .recent_files
                .iter()
                .filter(|p| **p == PathBuf::from("/img/5.png"))
                .count(),
            1
        );
    }

    #[test]
    fn ensure_output_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            output_dir: dir.path().join("a").join("b"),
            ..Config::default()
        };
        let created = config.ensure_output_dir().unwrap().to_path_buf();
        assert!(created.is_dir());
        assert_eq!(created, dir.path().join("a").join("b"));
    }
}
