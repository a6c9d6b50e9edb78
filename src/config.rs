//! Configuration.
//!
//! Configuration is read from a TOML file. Every section and key is optional; missing values
//! fall back to the defaults documented on each field.
//!
//! ```toml
//! [mapping]
//! position_factor = 5.0
//! scale_factor = 5.0
//! idle_spin_rate = 0.2
//!
//! [camera]
//! fov_degrees = 75.0
//!
//! [overlay.connectors]
//! color = "#00ff00"
//! line_width = 5
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::image::{Color, Resolution};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mapping: MappingConfig,
    pub camera: CameraConfig,
    pub object: ObjectConfig,
    pub overlay: OverlayConfig,
    pub replay: ReplayConfig,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, key: &'static str, reason: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    key,
                    reason: reason.to_string(),
                })
            }
        }

        let m = &self.mapping;
        check(m.position_factor.is_finite(), "mapping.position_factor", "must be finite")?;
        check(
            m.scale_factor.is_finite() && m.scale_factor >= 0.0,
            "mapping.scale_factor",
            "must be finite and not negative",
        )?;
        check(m.idle_spin_rate.is_finite(), "mapping.idle_spin_rate", "must be finite")?;

        let c = &self.camera;
        check(
            c.fov_degrees > 0.0 && c.fov_degrees < 180.0,
            "camera.fov_degrees",
            "must be between 0 and 180 degrees",
        )?;
        check(
            c.near.is_finite() && c.near > 0.0,
            "camera.near",
            "must be finite and positive",
        )?;
        check(
            c.far.is_finite() && c.far > c.near,
            "camera.far",
            "must be finite and greater than `camera.near`",
        )?;
        check(c.distance.is_finite(), "camera.distance", "must be finite")?;

        let o = &self.object;
        check(
            o.size.is_finite() && o.size > 0.0,
            "object.size",
            "must be finite and positive",
        )?;

        let line_width_ok = |width: u32| (1..=StyleConfig::MAX_LINE_WIDTH).contains(&width);
        let width_reason = format!("must be between 1 and {}", StyleConfig::MAX_LINE_WIDTH);
        check(
            line_width_ok(self.overlay.connectors.line_width),
            "overlay.connectors.line_width",
            &width_reason,
        )?;
        check(
            line_width_ok(self.overlay.landmarks.line_width),
            "overlay.landmarks.line_width",
            &width_reason,
        )?;

        let r = &self.replay;
        check(
            r.width > 0 && r.height > 0,
            "replay.width",
            "replay resolution must not be empty",
        )?;
        check(
            r.refresh_hz.is_finite() && r.refresh_hz > 0.0,
            "replay.refresh_hz",
            "must be finite and positive",
        )?;
        Ok(())
    }
}

/// Constants used to map hand landmarks to the object transform.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    /// Scene units per normalized frame width/height. Default: 5.
    pub position_factor: f32,
    /// Object scale per unit of normalized pinch distance. Default: 5.
    pub scale_factor: f32,
    /// Idle spin speed around X and Y in radians per second. Default: 0.2.
    pub idle_spin_rate: f32,
}

impl MappingConfig {
    pub const DEFAULT_POSITION_FACTOR: f32 = 5.0;
    pub const DEFAULT_SCALE_FACTOR: f32 = 5.0;
    pub const DEFAULT_IDLE_SPIN_RATE: f32 = 0.2;
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            position_factor: Self::DEFAULT_POSITION_FACTOR,
            scale_factor: Self::DEFAULT_SCALE_FACTOR,
            idle_spin_rate: Self::DEFAULT_IDLE_SPIN_RATE,
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Vertical field of view. Default: 75 degrees.
    pub fov_degrees: f32,
    /// Default: 0.1.
    pub near: f32,
    /// Default: 100.
    pub far: f32,
    /// Distance from the origin along +Z. Default: 2.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            distance: 2.0,
        }
    }
}

/// The tracked box.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectConfig {
    /// Edge length in scene units. Default: 0.5.
    pub size: f32,
    /// Wireframe color. Default: `#00ff00`.
    pub color: Color,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            size: 0.5,
            color: Color::GREEN,
        }
    }
}

/// Landmark overlay styles.
///
/// Each style key can be overridden on its own; omitted keys keep their default.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(from = "OverlayToml")]
pub struct OverlayConfig {
    /// Default: `#00ff00`, width 5.
    pub connectors: StyleConfig,
    /// Default: `#ff0000`, width 2.
    pub landmarks: StyleConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            connectors: StyleConfig {
                color: Color::GREEN,
                line_width: 5,
            },
            landmarks: StyleConfig {
                color: Color::RED,
                line_width: 2,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StyleConfig {
    pub color: Color,
    /// Line width in pixels, `1..=StyleConfig::MAX_LINE_WIDTH`.
    pub line_width: u32,
}

impl StyleConfig {
    pub const MAX_LINE_WIDTH: u32 = 64;
}

/// `[overlay]` as written in the file.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OverlayToml {
    connectors: StyleToml,
    landmarks: StyleToml,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleToml {
    color: Option<Color>,
    line_width: Option<u32>,
}

impl StyleToml {
    fn or(self, default: StyleConfig) -> StyleConfig {
        StyleConfig {
            color: self.color.unwrap_or(default.color),
            line_width: self.line_width.unwrap_or(default.line_width),
        }
    }
}

impl From<OverlayToml> for OverlayConfig {
    fn from(raw: OverlayToml) -> Self {
        let default = Self::default();
        Self {
            connectors: raw.connectors.or(default.connectors),
            landmarks: raw.landmarks.or(default.landmarks),
        }
    }
}

/// Settings for replaying recorded landmark traces.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Resolution of the replayed video and of the output window. Default: 640x480.
    pub width: u32,
    pub height: u32,
    /// Rate of the simulated display refresh. Default: 60 Hz.
    pub refresh_hz: f64,
}

impl ReplayConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            refresh_hz: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.mapping.position_factor, 5.0);
        assert_eq!(config.mapping.scale_factor, 5.0);
        assert_eq!(config.mapping.idle_spin_rate, 0.2);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.camera.distance, 2.0);
        assert_eq!(config.object.size, 0.5);
        assert_eq!(config.object.color, Color::GREEN);
        assert_eq!(config.replay.resolution(), Resolution::new(640, 480));
    }

    #[test]
    fn empty_file_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.mapping.position_factor, 5.0);
        assert_eq!(config.overlay.landmarks.color, Color::RED);
    }

    #[test]
    fn overrides() {
        let config = Config::from_toml(
            r##"
            [mapping]
            idle_spin_rate = 1.5

            [object]
            color = "#ff00ff"

            [overlay.connectors]
            color = "#123456"
            line_width = 3
            "##,
        )
        .unwrap();
        assert_eq!(config.mapping.idle_spin_rate, 1.5);
        assert_eq!(config.mapping.scale_factor, 5.0);
        assert_eq!(config.object.color, Color::from_rgb8(0xff, 0x00, 0xff));
        assert_eq!(config.overlay.connectors.line_width, 3);
        assert_eq!(config.overlay.connectors.color, Color::from_rgb8(0x12, 0x34, 0x56));
        assert_eq!(config.overlay.landmarks.line_width, 2);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Config::from_toml("[camera]\nnear = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "camera.near", .. }));

        let err = Config::from_toml("[camera]\nnear = 10.0\nfar = 5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "camera.far", .. }));

        let err = Config::from_toml("[object]\nsize = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "object.size", .. }));

        let err = Config::from_toml("[overlay.landmarks]\nline_width = 3000000000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "overlay.landmarks.line_width", .. }
        ));

        let err = Config::from_toml("[overlay.connectors]\nline_width = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "overlay.connectors.line_width", .. }
        ));
    }

    #[test]
    fn rejects_infinite_values() {
        let err = Config::from_toml("[camera]\nfar = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "camera.far", .. }));

        let err = Config::from_toml("[object]\nsize = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "object.size", .. }));

        let err = Config::from_toml("[replay]\nrefresh_hz = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "replay.refresh_hz", .. }));
    }

    #[test]
    fn partial_style_override() {
        let config = Config::from_toml("[overlay.connectors]\nline_width = 3\n").unwrap();
        assert_eq!(config.overlay.connectors.line_width, 3);
        assert_eq!(config.overlay.connectors.color, Color::GREEN);
        assert_eq!(config.overlay.landmarks.line_width, 2);

        let config = Config::from_toml("[overlay.landmarks]\ncolor = \"#0000ff\"\n").unwrap();
        assert_eq!(config.overlay.landmarks.color, Color::BLUE);
        assert_eq!(config.overlay.landmarks.line_width, 2);
        assert_eq!(config.overlay.connectors.line_width, 5);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::from_toml("[object]\ncolor = \"green\"\n").unwrap_err(),
            ConfigError::Parse(_)
        ));
        assert!(matches!(
            Config::from_toml("[mapping]\nunknown_key = 1\n").unwrap_err(),
            ConfigError::Parse(_)
        ));
        assert!(matches!(
            Config::from_toml("[overlay.landmarks]\nwidth = 1\n").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn missing_file() {
        let err = Config::load("/nonexistent/handcube.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
