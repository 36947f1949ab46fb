use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Popup configuration, read from `config.json` in the Waylight config dir
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    /// Quiet period after the last keystroke before a search is sent
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Delay between a layout change and the paint work that depends on it
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,

    /// Reply delay of the offline backend
    #[serde(default = "default_mock_delay")]
    pub mock_delay_ms: u64,

    /// Backend socket; `None` means `$XDG_RUNTIME_DIR/waylight.sock`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,
}

fn default_debounce() -> u64 {
    50
}
fn default_frame_interval() -> u64 {
    16
}
fn default_mock_delay() -> u64 {
    50
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            frame_interval_ms: default_frame_interval(),
            mock_delay_ms: default_mock_delay(),
            socket_path: None,
        }
    }
}

impl PopupConfig {
    /// Default location of the config file (`~/.config/waylight/config.json`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "waylight").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load config from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON, or
    /// holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_interval_ms == 0 {
            return Err(Error::Config("frameIntervalMs must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    #[must_use]
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = PopupConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert_eq!(config.mock_delay(), Duration::from_millis(50));
        assert!(config.socket_path.is_none());
    }

    #[test]
    fn test_config_load_nonexistent_returns_default() {
        let path = Path::new("/nonexistent/path/config.json");
        let config = PopupConfig::load(path).unwrap();
        assert_eq!(config, PopupConfig::default());
    }

    #[test]
    fn test_config_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"debounceMs": 120, "socketPath": "/run/user/1000/launcher.sock", "theme": "dark"}}"#
        )
        .unwrap();

        let config = PopupConfig::load(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(
            config.socket_path,
            Some(PathBuf::from("/run/user/1000/launcher.sock"))
        );
    }

    #[test]
    fn test_config_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ debounceMs: ").unwrap();

        assert!(matches!(
            PopupConfig::load(file.path()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_frame_interval() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"frameIntervalMs": 0}}"#).unwrap();

        assert!(matches!(
            PopupConfig::load(file.path()),
            Err(Error::Config(_))
        ));
    }
}
