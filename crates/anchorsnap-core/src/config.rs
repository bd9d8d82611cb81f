//! Container configuration.
//!
//! A [`ContainerConfig`] holds everything fixed for a container's lifetime:
//! the legal anchors, the insets, the stack layout and the deceleration
//! rate. It round-trips through JSON.

use crate::anchor::AnchorSet;
use crate::geometry::{DecelerationRate, Insets};
use crate::stack::StackLayoutKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings a container is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Anchors items may snap to.
    pub anchors: AnchorSet,
    /// Margins anchors are computed within.
    pub insets: Insets,
    /// Layout for items sharing an anchor.
    pub layout: StackLayoutKind,
    /// Rate used to project release velocities.
    pub deceleration_rate: DecelerationRate,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            anchors: AnchorSet::CORNERS,
            insets: Insets::uniform(16.0),
            layout: StackLayoutKind::default(),
            deceleration_rate: DecelerationRate::NORMAL,
        }
    }
}

impl ContainerConfig {
    /// Check that every value is usable.
    ///
    /// An empty anchor set is accepted: snapping then falls back to the
    /// canvas center.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let insets = [
            self.insets.top,
            self.insets.leading,
            self.insets.bottom,
            self.insets.trailing,
        ];
        if insets.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "insets must be finite and non-negative, got {:?}",
                self.insets
            )));
        }
        if !self.deceleration_rate.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "deceleration rate must be between 0 and 1, got {}",
                self.deceleration_rate.value()
            )));
        }
        if !self.layout.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "layout parameters must be finite and non-negative, got {:?}",
                self.layout
            )));
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading container config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{CascadeStackLayout, CircleStackLayout};
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(ContainerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ContainerConfig {
            anchors: AnchorSet::ALL,
            insets: Insets::new(8.0, 12.0, 8.0, 12.0),
            layout: CircleStackLayout::new(30.0).into(),
            deceleration_rate: DecelerationRate::FAST,
        };
        let json = config.to_json().unwrap();
        assert_eq!(ContainerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ContainerConfig::from_json(r#"{ "anchors": 511 }"#).unwrap();
        assert_eq!(config.anchors, AnchorSet::ALL);
        assert_eq!(config.insets, Insets::uniform(16.0));
        assert_eq!(config.layout, CascadeStackLayout::default().into());
        assert_eq!(config.deceleration_rate, DecelerationRate::NORMAL);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ContainerConfig::from_json(r#"{ "deceleration_rate": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ContainerConfig::from_json(
            r#"{ "insets": { "top": -1.0, "leading": 0.0, "bottom": 0.0, "trailing": 0.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ContainerConfig::from_json(r#"{ "layout": { "kind": "circle", "radius": -3.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ContainerConfig::from_json(r#"{ "anchors": 4096 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "anchors": 16, "layout": {{ "kind": "fan", "angle": 0.1 }} }}"#
        )
        .unwrap();

        let config = ContainerConfig::load(file.path()).unwrap();
        assert_eq!(config.anchors, AnchorSet::CENTER);
        assert!(matches!(config.layout, StackLayoutKind::Fan(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContainerConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
