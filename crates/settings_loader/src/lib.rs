//! # Settings Loader
//!
//! Loads `settings.json` for the ledger tools. The file tunes the dashboard
//! (currency symbol, number of months in the revenue chart, how orders with
//! unreadable dates are handled) and the cart invoice (shipping fee, tax rate).
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/my_settings.json")?;
//!
//! // Load optional settings (returns None if no path is given)
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Resolves the settings used by a run.
///
/// An explicit path must load. Without one, `settings.json` in the current
/// directory is used when present, otherwise the built-in defaults.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }
    if settings_file_exists(DEFAULT_SETTINGS_FILE) {
        return load_default_settings();
    }
    tracing::debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::DateFallback;
    use std::io::Write;

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tax_rate": 0.05, "unparsed_dates": "flag"}}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.tax_rate, 0.05);
        assert_eq!(settings.unparsed_dates, DateFallback::Flag);
        assert_eq!(settings.chart_window, 6);
    }

    #[test]
    fn test_load_settings_reports_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_settings(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }

    #[test]
    fn test_load_optional_settings_none() {
        assert!(load_optional_settings(None).unwrap().is_none());
    }

    #[test]
    fn test_fallback_prefers_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"shipping_fee": 250}}"#).unwrap();
        let path = file.path().to_path_buf();

        let settings = load_settings_with_fallback(Some(&path)).unwrap();
        assert_eq!(settings.shipping_fee, 250.0);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_settings_with_fallback(Some(&missing)).is_err());
    }
}
