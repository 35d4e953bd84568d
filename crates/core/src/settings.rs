//! Viewer settings loaded from a TOML file
//!
//! Stored at the platform config dir (`settings.toml`); every field has a
//! default so a missing or partial file is fine.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Base URL of the booking backend
    pub backend_url: String,
    /// Exhibition opened on startup when none is given on the command line
    pub default_exhibition_id: i64,
    /// Canvas units per physical meter; drives the grid spacing and the
    /// dimension fallback during normalization
    pub canvas_units_per_meter: f64,
    /// Padding around the plan for fit-to-screen, in screen pixels
    pub fit_padding: f64,
    /// Grace delay before a hover leave is committed
    pub hover_grace_ms: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080/api".to_string(),
            default_exhibition_id: 1,
            canvas_units_per_meter: 20.0,
            fit_padding: 40.0,
            hover_grace_ms: 50,
        }
    }
}

impl ViewerSettings {
    /// Load from the platform config directory; defaults if absent.
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "expofloor", "expofloor").ok_or_else(|| {
            Error::Settings("Could not determine config directory".to_string())
        })?;
        Self::load_from(&dirs.config_dir().join("settings.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&raw)?;
        Ok(settings.sanitized())
    }

    /// Replace out-of-range numeric fields with their defaults. The scale
    /// and padding feed divisions and loop steps downstream, so a zero,
    /// negative, or non-finite value from the file must never get through.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.canvas_units_per_meter > 0.0 && self.canvas_units_per_meter.is_finite()) {
            warn!(
                value = self.canvas_units_per_meter,
                "Invalid canvas_units_per_meter in settings, using default"
            );
            self.canvas_units_per_meter = defaults.canvas_units_per_meter;
        }
        if !(self.fit_padding >= 0.0 && self.fit_padding.is_finite()) {
            warn!(
                value = self.fit_padding,
                "Invalid fit_padding in settings, using default"
            );
            self.fit_padding = defaults.fit_padding;
        }
        self
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "expofloor", "expofloor")
            .map(|d| d.config_dir().join("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ViewerSettings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings.canvas_units_per_meter, 20.0);
        assert_eq!(settings.hover_grace_ms, 50);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "backend_url = \"https://expo.example.com/api\"").unwrap();
        writeln!(f, "canvas_units_per_meter = 10.0").unwrap();

        let settings = ViewerSettings::load_from(&path).unwrap();
        assert_eq!(settings.backend_url, "https://expo.example.com/api");
        assert_eq!(settings.canvas_units_per_meter, 10.0);
        assert_eq!(settings.fit_padding, 40.0);
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "canvas_units_per_meter = 0.0\nfit_padding = -5.0\n",
        )
        .unwrap();

        let settings = ViewerSettings::load_from(&path).unwrap();
        assert_eq!(settings.canvas_units_per_meter, 20.0);
        assert_eq!(settings.fit_padding, 40.0);
    }

    #[test]
    fn test_negative_scale_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "canvas_units_per_meter = -3.0\n").unwrap();
        let settings = ViewerSettings::load_from(&path).unwrap();
        assert_eq!(settings.canvas_units_per_meter, 20.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "backend_url = [not toml").unwrap();
        assert!(ViewerSettings::load_from(&path).is_err());
    }
}
