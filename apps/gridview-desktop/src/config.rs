use gridview_driver::DriverConfig;
use gridview_interact::HoverMotion;
use gridview_render::GridConfig;
use gridview_tools::StatsPanel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Grids".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Desktop viewer settings, read from an optional JSON file.
/// Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub hover: HoverMotion,
    pub grid: GridConfig,
    pub stats_panel: StatsPanel,
    /// Longest frame delta handed to animation, in milliseconds.
    pub max_delta_ms: Option<u64>,
    /// Clear color as linear RGBA. Unset keeps the renderer default.
    pub background: Option<[f32; 4]>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        if !self.hover.rate.is_finite() || self.hover.rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hover rate must be finite and >= 0, got {}",
                self.hover.rate
            )));
        }
        for (name, v) in [
            ("grid.primary_size", self.grid.primary_size),
            ("grid.secondary_size", self.grid.secondary_size),
            ("grid.distance", self.grid.distance),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    pub fn driver_config(&self) -> DriverConfig {
        match self.max_delta_ms {
            Some(ms) => DriverConfig {
                max_delta: Duration::from_millis(ms),
            },
            None => DriverConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.driver_config(), DriverConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.stats_panel, StatsPanel::Mb);
    }

    #[test]
    fn rejects_non_finite_rate() {
        let mut config = AppConfig::default();
        config.hover.rate = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn partial_file_overrides_fields() {
        let json = r#"{
            "window": { "width": 640 },
            "hover": { "raised_offset": 1.5 },
            "grid": { "color": [255, 0, 0], "primary_size": 2.5 },
            "stats_panel": "ms",
            "max_delta_ms": 50
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.hover.raised_offset, 1.5);
        assert_eq!(config.hover.rate, 5.0);
        assert_eq!(config.grid.color, [255, 0, 0]);
        assert_eq!(config.grid.secondary_size, 10.0);
        assert_eq!(config.stats_panel, StatsPanel::Ms);
        assert_eq!(config.driver_config().max_delta, Duration::from_millis(50));
    }

    #[test]
    fn rejects_negative_grid_size() {
        let mut config = AppConfig::default();
        config.grid.primary_size = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/gridview.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
