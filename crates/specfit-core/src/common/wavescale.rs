//! Linear and log-linear pixel-to-wavelength scales as written in 1D FITS
//! headers (`CRVAL1`, `CDELT1`, `CRPIX1`, `DC-FLAG`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WavelengthScale {
    /// Reference value at `crpix`; `log10(wavelength)` when `log_linear`.
    pub crval: f64,
    pub cdelt: f64,
    pub crpix: f64,
    #[serde(default)]
    pub log_linear: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WavelengthScaleError {
    #[error("wavelength scale parameter '{field}' must be finite, got {value}")]
    NonFiniteParameter { field: &'static str, value: f64 },
    #[error("wavelength scale step must be > 0 for an increasing grid, got {value}")]
    NonPositiveStep { value: f64 },
}

impl WavelengthScale {
    pub fn linear(crval: f64, cdelt: f64, crpix: f64) -> Self {
        Self {
            crval,
            cdelt,
            crpix,
            log_linear: false,
        }
    }

    pub fn log_linear(crval: f64, cdelt: f64, crpix: f64) -> Self {
        Self {
            crval,
            cdelt,
            crpix,
            log_linear: true,
        }
    }

    pub fn wavelength(&self, pixel: f64) -> f64 {
        let value = self.crval + self.cdelt * (pixel - self.crpix);
        if self.log_linear {
            10.0_f64.powf(value)
        } else {
            value
        }
    }

    /// Wavelengths of pixels `0..len`.
    pub fn grid(&self, len: usize) -> Result<Vec<f64>, WavelengthScaleError> {
        self.validate()?;
        Ok((0..len).map(|pixel| self.wavelength(pixel as f64)).collect())
    }

    pub fn validate(&self) -> Result<(), WavelengthScaleError> {
        for (field, value) in [
            ("crval", self.crval),
            ("cdelt", self.cdelt),
            ("crpix", self.crpix),
        ] {
            if !value.is_finite() {
                return Err(WavelengthScaleError::NonFiniteParameter { field, value });
            }
        }
        if self.cdelt <= 0.0 {
            return Err(WavelengthScaleError::NonPositiveStep { value: self.cdelt });
        }
        Ok(())
    }
}
