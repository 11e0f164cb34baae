//! Configuration types for a screen recording.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::Region;

fn default_fps() -> u32 {
    60
}

fn default_duration_secs() -> u32 {
    10
}

fn default_output() -> PathBuf {
    PathBuf::from("output.diveo")
}

fn default_selector() -> String {
    "xrectsel".to_string()
}

/// Where frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Primary display (requires the `screen` feature).
    #[default]
    Screen,
    /// Generated moving test pattern.
    Synthetic,
}

/// Top-level recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Capture rate in frames per second. Stored in the stream as one byte.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Recording length in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    /// File the encoded stream is written to.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// External command that prints the selected rectangle as `WxH+X+Y`.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Fixed capture rectangle. When set, the selector is not run.
    #[serde(default)]
    pub region: Option<Region>,
    /// Frame source.
    #[serde(default)]
    pub source: SourceKind,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            duration_secs: default_duration_secs(),
            output: default_output(),
            selector: default_selector(),
            region: None,
            source: SourceKind::default(),
        }
    }
}

impl RecordingConfig {
    /// Number of frames captured over the whole recording.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.fps as usize * self.duration_secs as usize
    }

    /// Pause between captures (`1000 / fps` whole milliseconds).
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000u64.checked_div(self.fps as u64).unwrap_or(0))
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        if let Some(region) = self.region
            && region.is_empty()
        {
            return Err(ConfigError::EmptyRegion(region));
        }
        if self.fps > u8::MAX as u32 {
            log::warn!(
                "Frame rate {} does not fit the stream header and will be stored as {}",
                self.fps,
                self.fps & 0xFF
            );
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Frame rate must be non-zero")]
    InvalidFrameRate,
    #[error("Duration must be non-zero")]
    InvalidDuration,
    #[error("Capture region {0} has no pixels")]
    EmptyRegion(Region),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecordingConfig::default();
        assert_eq!(config.fps, 60);
        assert_eq!(config.duration_secs, 10);
        assert_eq!(config.frame_count(), 600);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert_eq!(config.output, PathBuf::from("output.diveo"));
        assert_eq!(config.source, SourceKind::Screen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RecordingConfig =
            serde_json::from_str(r#"{"fps": 30, "source": "synthetic"}"#).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.duration_secs, 10);
        assert_eq!(config.selector, "xrectsel");
        assert_eq!(config.source, SourceKind::Synthetic);
        assert!(config.region.is_none());
    }

    #[test]
    fn test_region_from_json() {
        let config: RecordingConfig = serde_json::from_str(
            r#"{"region": {"x": 10, "y": 20, "width": 320, "height": 240}}"#,
        )
        .unwrap();
        assert_eq!(config.region, Some(Region::new(10, 20, 320, 240)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = RecordingConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFrameRate)));

        let config = RecordingConfig {
            duration_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDuration)));

        let config = RecordingConfig {
            region: Some(Region::new(0, 0, 0, 10)),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRegion(_))));
    }

    #[test]
    fn test_high_frame_rate_is_allowed() {
        let config = RecordingConfig {
            fps: 300,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
