use crate::error::{Result, ResultExt as _, SweeperError};
use crate::logic::{LoadOptions, TargetFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User settings, stored as JSON. Missing fields take their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SweeperSettings {
    /// Rows shown by `preview` (default: 5)
    pub preview_rows: usize,
    /// Rows sampled when inferring CSV column types (default: 10000)
    pub infer_schema_length: usize,
    /// Whether CSV text that looks like a date is parsed as one
    pub try_parse_dates: bool,
    /// Conversion target when none is given on the command line
    pub default_target: TargetFormat,
    /// Where converted files are written; the current directory when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for SweeperSettings {
    fn default() -> Self {
        Self {
            preview_rows: crate::session::DEFAULT_PREVIEW_ROWS,
            infer_schema_length: 10_000,
            try_parse_dates: true,
            default_target: TargetFormat::Csv,
            output_dir: None,
        }
    }
}

impl SweeperSettings {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
            try_parse_dates: self.try_parse_dates,
        }
    }
}

/// `<config dir>/sweeper/config.json`, or `None` when the platform has no
/// config directory.
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sweeper").join("config.json"))
}

/// Loads settings from `path` when given, else from the default location.
///
/// An explicit path must exist and parse. A missing default file yields the
/// defaults.
pub fn load_settings(path: Option<&Path>) -> Result<SweeperSettings> {
    match path {
        Some(path) => read_settings(path),
        None => match get_config_path() {
            Some(path) if path.exists() => read_settings(&path),
            _ => Ok(SweeperSettings::default()),
        },
    }
}

fn read_settings(path: &Path) -> Result<SweeperSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SweeperError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    let settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn save_settings(settings: &SweeperSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SweeperSettings::default();
        assert_eq!(settings.preview_rows, 5);
        assert_eq!(settings.default_target, TargetFormat::Csv);
        assert_eq!(settings.load_options(), LoadOptions::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "preview_rows": 12, "default_target": "excel" }"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.preview_rows, 12);
        assert_eq!(settings.default_target, TargetFormat::Excel);
        assert!(settings.try_parse_dates);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let settings = SweeperSettings {
            output_dir: Some(PathBuf::from("out")),
            ..SweeperSettings::default()
        };

        save_settings(&settings, &path).unwrap();
        assert_eq!(load_settings(Some(&path)).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, SweeperError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, SweeperError::Config(_)));
    }
}
