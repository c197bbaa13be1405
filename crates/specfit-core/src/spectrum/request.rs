//! Parallel-array entry point: continuum, composite model and chi-squared in
//! one call.

use super::SpectrumError;
use super::absorption::{SkippedLine, composite_absorbers};
use super::chi2::{ChiSquaredBreakdown, WindowContribution, breakdown_over_ranges, locate_windows};
use super::continuum::evaluate_continuum;
use super::validate::{
    validate_control_points, validate_length, validate_lines, validate_observed, validate_windows,
};
use crate::common::ModelSettings;
use crate::domain::{AbsorptionLine, ContinuumPoint, ObservedSpectrum, WavelengthWindow};
use crate::numerics::WaveIndexLocator;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumModelInput<'a> {
    pub observed: ObservedSpectrum<'a>,
    pub control_points: &'a [ContinuumPoint],
    pub lines: &'a [AbsorptionLine],
    pub windows: &'a [WavelengthWindow],
    pub settings: ModelSettings,
}

impl<'a> SpectrumModelInput<'a> {
    pub fn new(
        observed: ObservedSpectrum<'a>,
        control_points: &'a [ContinuumPoint],
        lines: &'a [AbsorptionLine],
        windows: &'a [WavelengthWindow],
    ) -> Self {
        Self {
            observed,
            control_points,
            lines,
            windows,
            settings: ModelSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumEvaluation {
    /// Continuum per pixel, `NaN` outside `covered`.
    pub continuum: Vec<f64>,
    pub covered: Range<usize>,
    pub model: Vec<f64>,
    pub chi_squared: f64,
    pub windows: Vec<WindowContribution>,
    pub skipped: Vec<SkippedLine>,
}

/// Runs continuum, compositor and chi-squared over one observation.
///
/// Every input is validated before any buffer is allocated. Fit windows must
/// fall inside the pixels the continuum spline covers.
pub fn evaluate_spectrum(input: SpectrumModelInput<'_>) -> Result<SpectrumEvaluation, SpectrumError> {
    let SpectrumModelInput {
        observed,
        control_points,
        lines,
        windows,
        settings,
    } = input;
    validate_observed(&observed)?;
    validate_control_points(control_points)?;
    validate_lines(lines)?;
    validate_windows(windows)?;
    settings.validate()?;

    let grid = observed.wavelength;
    let locator = WaveIndexLocator::new(settings.velocity_dispersion_kms);
    let ranges = locate_windows(grid, windows, &locator)?;

    let continuum = evaluate_continuum(grid, control_points, &settings)?;
    if let Some((index, pixels)) = ranges
        .iter()
        .enumerate()
        .find(|(_, pixels)| !continuum.covers(pixels))
    {
        return Err(SpectrumError::WindowOutsideContinuum {
            index,
            start: pixels.start,
            end: pixels.end,
            covered_start: continuum.covered.start,
            covered_end: continuum.covered.end,
        });
    }

    let composite = composite_absorbers(grid, &continuum.values, lines, &settings)?;
    let ChiSquaredBreakdown { total, windows } =
        breakdown_over_ranges(&observed, &composite.model, windows, ranges)?;

    Ok(SpectrumEvaluation {
        continuum: continuum.values,
        covered: continuum.covered,
        model: composite.model,
        chi_squared: total,
        windows,
        skipped: composite.skipped,
    })
}

/// Parallel-array form of a full evaluation, as exchanged with callers that
/// hold each attribute in its own dense array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpectrumRequest {
    pub wavelength: Vec<f64>,
    pub flux: Vec<f64>,
    pub uncertainty: Vec<f64>,
    pub continuum_x: Vec<f64>,
    pub continuum_y: Vec<f64>,
    #[serde(default)]
    pub column_density: Vec<f64>,
    #[serde(default)]
    pub doppler: Vec<f64>,
    #[serde(default)]
    pub redshift: Vec<f64>,
    #[serde(default)]
    pub rest_wavelength: Vec<f64>,
    #[serde(default)]
    pub gamma: Vec<f64>,
    #[serde(default)]
    pub oscillator_strength: Vec<f64>,
    #[serde(default)]
    pub window_starts: Vec<f64>,
    #[serde(default)]
    pub window_ends: Vec<f64>,
    #[serde(default)]
    pub settings: ModelSettings,
}

impl SpectrumRequest {
    pub fn observed(&self) -> ObservedSpectrum<'_> {
        ObservedSpectrum::new(&self.wavelength, &self.flux, &self.uncertainty)
    }

    pub fn control_points(&self) -> Result<Vec<ContinuumPoint>, SpectrumError> {
        validate_length("continuum_y", self.continuum_x.len(), self.continuum_y.len())?;
        Ok(self
            .continuum_x
            .iter()
            .zip(&self.continuum_y)
            .map(|(&x, &y)| ContinuumPoint::new(x, y))
            .collect())
    }

    pub fn absorption_lines(&self) -> Result<Vec<AbsorptionLine>, SpectrumError> {
        let expected = self.column_density.len();
        for (field, values) in [
            ("doppler", &self.doppler),
            ("redshift", &self.redshift),
            ("rest_wavelength", &self.rest_wavelength),
            ("gamma", &self.gamma),
            ("oscillator_strength", &self.oscillator_strength),
        ] {
            validate_length(field, expected, values.len())?;
        }

        Ok((0..expected)
            .map(|index| {
                AbsorptionLine::new(
                    self.column_density[index],
                    self.doppler[index],
                    self.redshift[index],
                    self.rest_wavelength[index],
                    self.gamma[index],
                    self.oscillator_strength[index],
                )
            })
            .collect())
    }

    pub fn windows(&self) -> Result<Vec<WavelengthWindow>, SpectrumError> {
        validate_length("window_ends", self.window_starts.len(), self.window_ends.len())?;
        Ok(self
            .window_starts
            .iter()
            .zip(&self.window_ends)
            .map(|(&start, &end)| WavelengthWindow::new(start, end))
            .collect())
    }

    pub fn evaluate(&self) -> Result<SpectrumEvaluation, SpectrumError> {
        let control_points = self.control_points()?;
        let lines = self.absorption_lines()?;
        let windows = self.windows()?;
        evaluate_spectrum(
            SpectrumModelInput::new(self.observed(), &control_points, &lines, &windows)
                .with_settings(self.settings),
        )
    }
}
