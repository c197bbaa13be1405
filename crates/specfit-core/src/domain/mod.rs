pub mod errors;

pub use errors::{SpecfitError, SpecfitErrorCategory};

use serde::{Deserialize, Serialize};

/// Continuum knot in (wavelength, flux).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ContinuumPoint {
    pub x: f64,
    pub y: f64,
}

impl ContinuumPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One Voigt absorber.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AbsorptionLine {
    /// `log10` column density.
    pub column_density: f64,
    /// Doppler parameter `b`, km/s.
    pub doppler: f64,
    pub redshift: f64,
    /// Rest-frame wavelength, Angstrom.
    pub rest_wavelength: f64,
    /// Damping constant, s^-1.
    pub gamma: f64,
    pub oscillator_strength: f64,
}

impl AbsorptionLine {
    pub const fn new(
        column_density: f64,
        doppler: f64,
        redshift: f64,
        rest_wavelength: f64,
        gamma: f64,
        oscillator_strength: f64,
    ) -> Self {
        Self {
            column_density,
            doppler,
            redshift,
            rest_wavelength,
            gamma,
            oscillator_strength,
        }
    }

    pub fn observed_wavelength(&self) -> f64 {
        (1.0 + self.redshift) * self.rest_wavelength
    }
}

/// Half-open fit region `[start, end)` in wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WavelengthWindow {
    pub start: f64,
    pub end: f64,
}

impl WavelengthWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Observed samples sharing one strictly increasing wavelength grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedSpectrum<'a> {
    pub wavelength: &'a [f64],
    pub flux: &'a [f64],
    pub uncertainty: &'a [f64],
}

impl<'a> ObservedSpectrum<'a> {
    pub fn new(wavelength: &'a [f64], flux: &'a [f64], uncertainty: &'a [f64]) -> Self {
        Self {
            wavelength,
            flux,
            uncertainty,
        }
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AbsorptionLine, ContinuumPoint, WavelengthWindow};

    #[test]
    fn observed_wavelength_applies_redshift() {
        let line = AbsorptionLine::new(13.0, 20.0, 2.5, 1215.67, 6.265e8, 0.4164);
        assert!((line.observed_wavelength() - 3.5 * 1215.67).abs() <= 1.0e-9);
    }

    #[test]
    fn records_round_trip_through_json() {
        let point: ContinuumPoint =
            serde_json::from_str(r#"{ "x": 4000.0, "y": 1.5 }"#).expect("point");
        assert_eq!(point, ContinuumPoint::new(4000.0, 1.5));

        let window: WavelengthWindow =
            serde_json::from_str(r#"{ "start": 4001.0, "end": 4002.5 }"#).expect("window");
        assert_eq!(window, WavelengthWindow::new(4001.0, 4002.5));
    }
}
