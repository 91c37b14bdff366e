//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::table::SortDirection;
use crate::upload::DEFAULT_MAX_FILE_BYTES;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan service settings
    pub scan: ScanSettings,
    /// Upload limits
    pub upload: UploadSettings,
    /// Overlay settings
    pub overlay: OverlaySettings,
    /// Result table settings
    pub table: TableSettings,
}

/// Scan service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Endpoint receiving `{"base64": ...}` POST requests
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Replay a saved response instead of calling the endpoint
    pub fixture_path: Option<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/ocr/scan".to_string(),
            timeout_secs: 60,
            fixture_path: None,
        }
    }
}

impl ScanSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Largest accepted file in bytes
    pub max_file_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Overlay-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Show labels under each box at startup
    pub show_labels: bool,
    /// Outline and label color (RGB)
    pub outline_color: [u8; 3],
    /// Outline stroke width
    pub stroke_width: f32,
    /// Label font size
    pub label_font_size: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            outline_color: [230, 25, 75],
            stroke_width: 3.0,
            label_font_size: 14.0,
        }
    }
}

/// Result table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Direction used when a column is sorted for the first time
    pub default_sort_direction: SortDirection,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check scan defaults
        assert!(config.scan.endpoint.starts_with("http://"));
        assert_eq!(config.scan.timeout_secs, 60);
        assert!(config.scan.fixture_path.is_none());

        // Check upload defaults
        assert_eq!(config.upload.max_file_bytes, 5_000_000);

        // Check overlay defaults
        assert!(config.overlay.show_labels);
        assert_eq!(config.overlay.outline_color, [230, 25, 75]);
        assert!((config.overlay.stroke_width - 3.0).abs() < 0.01);

        // Check table defaults
        assert_eq!(config.table.default_sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.scan.endpoint, parsed.scan.endpoint);
        assert_eq!(config.upload.max_file_bytes, parsed.upload.max_file_bytes);
        assert_eq!(config.overlay.show_labels, parsed.overlay.show_labels);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [upload]
            max_file_bytes = 2000000

            [table]
            default_sort_direction = "desc"
        "#;

        let parsed: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(parsed.upload.max_file_bytes, 2_000_000);
        assert_eq!(parsed.table.default_sort_direction, SortDirection::Descending);
        assert_eq!(parsed.scan.timeout_secs, 60);
        assert!(parsed.overlay.show_labels);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.scan.fixture_path = Some(PathBuf::from("fixtures/receipt.json"));
        config.overlay.show_labels = false;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.scan.fixture_path, Some(PathBuf::from("fixtures/receipt.json")));
        assert!(!loaded.overlay.show_labels);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
