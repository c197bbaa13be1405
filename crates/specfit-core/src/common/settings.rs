//! Runtime model settings.
//!
//! Defaults reproduce the reference constants in [`super::constants`]; a JSON
//! document may override any subset of fields.

use super::constants::{
    DEFAULT_CENTER_SAMPLES, DEFAULT_EDGE_MARGIN, DEFAULT_SPLINE_SUBDIVISIONS,
    DEFAULT_TAU_THRESHOLD, DEFAULT_VELOCITY_DISPERSION_KMS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Direction of the multiplicative line update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// `model /= exp(tau)`
    #[default]
    Absorption,
    /// `model *= exp(tau)`
    Emission,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSettings {
    pub velocity_dispersion_kms: f64,
    pub spline_subdivisions: usize,
    pub center_samples: usize,
    pub tau_threshold: f64,
    pub edge_margin: usize,
    pub line_mode: LineMode,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            velocity_dispersion_kms: DEFAULT_VELOCITY_DISPERSION_KMS,
            spline_subdivisions: DEFAULT_SPLINE_SUBDIVISIONS,
            center_samples: DEFAULT_CENTER_SAMPLES,
            tau_threshold: DEFAULT_TAU_THRESHOLD,
            edge_margin: DEFAULT_EDGE_MARGIN,
            line_mode: LineMode::Absorption,
        }
    }
}

impl ModelSettings {
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    pub fn with_velocity_dispersion(mut self, velocity_dispersion_kms: f64) -> Self {
        self.velocity_dispersion_kms = velocity_dispersion_kms;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidSetting> {
        for (field, value) in [
            ("velocity_dispersion_kms", self.velocity_dispersion_kms),
            ("tau_threshold", self.tau_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidSetting { field, value });
            }
        }
        for (field, count) in [
            ("spline_subdivisions", self.spline_subdivisions),
            ("center_samples", self.center_samples),
            ("edge_margin", self.edge_margin),
        ] {
            if count == 0 {
                return Err(InvalidSetting { field, value: 0.0 });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("model setting '{field}' must be finite and > 0, got {value}")]
pub struct InvalidSetting {
    pub field: &'static str,
    pub value: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] InvalidSetting),
    #[error("failed to read model settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse model settings '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_model_settings(path: impl AsRef<Path>) -> Result<ModelSettings, SettingsError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: ModelSettings =
        serde_json::from_str(&source).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}
