//! Configuration and serialization module

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::render::InsetAnchor;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial window width in pixels
    pub window_width: u32,
    /// Initial window height in pixels
    pub window_height: u32,
    /// Inset preview size as a fraction of the frame (0.05 to 0.5)
    pub inset_fraction: f32,
    /// Frame corner the inset preview is anchored to
    pub inset_anchor: InsetAnchor,
    /// Corner nudge step in logical units
    pub nudge_step: f32,
    /// Neutral background clear color
    pub clear_color: [f32; 4],
    /// Content camera settings
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            inset_fraction: 0.25,
            inset_anchor: InsetAnchor::BottomRight,
            nudge_step: 0.01,
            clear_color: [0.1, 0.1, 0.15, 1.0],
            camera: CameraConfig::default(),
        }
    }
}

/// Content camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Initial eye position
    pub position: [f32; 3],
    /// Initial look-at target
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            position: [0.0, 2.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    ///
    /// A missing file yields the defaults; a malformed file is an error so
    /// a typo never silently reverts the whole configuration.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = AppConfig::default();
        assert!(config.inset_fraction > 0.0 && config.inset_fraction <= 0.5);
        assert!(config.nudge_step > 0.0);
        assert!(config.window_width > 0 && config.window_height > 0);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/projmap-author.json")).unwrap();
        assert_eq!(config.window_width, AppConfig::default().window_width);
    }

    #[test]
    fn test_round_trip() {
        let mut config = AppConfig::default();
        config.inset_fraction = 0.3;
        let text = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.inset_fraction, 0.3);
    }
}
