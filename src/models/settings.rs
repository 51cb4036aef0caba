use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BASE_OFFSET, DEFAULT_CURVE_POINTS, DEFAULT_GREEN_WEIGHT, DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM,
    DEFAULT_ORANGE_WEIGHT, DEFAULT_RED_WEIGHT,
};
use crate::geometry::SelfLoopStyle;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Shape of the curves drawn for parallel legs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    /// Offset of the first leg of a pair; the n-th duplicate uses `base_offset * (n + 1)`
    pub base_offset: f64,
    /// Samples per curve
    pub points: usize,
    pub self_loops: SelfLoopStyle,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            base_offset: DEFAULT_BASE_OFFSET,
            points: DEFAULT_CURVE_POINTS,
            self_loops: SelfLoopStyle::default(),
        }
    }
}

/// Severity weights of the risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub red: f64,
    pub orange: f64,
    pub green: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_WEIGHT,
            orange: DEFAULT_ORANGE_WEIGHT,
            green: DEFAULT_GREEN_WEIGHT,
        }
    }
}

/// Initial view handed to the map adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub center: (f64, f64),
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

/// Tuning knobs for a render pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExplorerSettings {
    #[serde(default)]
    pub curve: CurveSettings,
    #[serde(default)]
    pub risk: RiskWeights,
    #[serde(default)]
    pub map: MapSettings,
}

impl ExplorerSettings {
    /// Create new settings with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON, filling missing fields with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json).map_err(|source| SettingsError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is out of range.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every value can be used by a render pass
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.curve.base_offset.is_finite() {
            return Err(SettingsError::Invalid {
                field: "curve.base_offset",
                reason: "must be a finite number".to_string(),
            });
        }
        if self.curve.points < 2 {
            return Err(SettingsError::Invalid {
                field: "curve.points",
                reason: format!("need at least 2 samples, got {}", self.curve.points),
            });
        }
        for (field, weight) in [
            ("risk.red", self.risk.red),
            ("risk.orange", self.risk.orange),
            ("risk.green", self.risk.green),
        ] {
            if !weight.is_finite() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a finite number".to_string(),
                });
            }
        }
        Ok(())
    }
}
