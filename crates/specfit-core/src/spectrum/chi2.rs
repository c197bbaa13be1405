use super::SpectrumError;
use super::validate::{validate_length, validate_observed, validate_windows};
use crate::common::ModelSettings;
use crate::domain::{ObservedSpectrum, WavelengthWindow};
use crate::numerics::WaveIndexLocator;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WindowContribution {
    pub window: WavelengthWindow,
    pub pixels: Range<usize>,
    pub chi_squared: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChiSquaredBreakdown {
    pub total: f64,
    pub windows: Vec<WindowContribution>,
}

/// Maps each window onto the half-open pixel range between its located
/// endpoints. The end is searched from the start pixel onwards.
pub fn locate_windows(
    grid: &[f64],
    windows: &[WavelengthWindow],
    locator: &WaveIndexLocator,
) -> Result<Vec<Range<usize>>, SpectrumError> {
    windows
        .iter()
        .enumerate()
        .map(|(index, window)| {
            let start = locator.locate(grid, window.start).map_err(|source| {
                SpectrumError::WindowIndexNotFound {
                    index,
                    endpoint: "start",
                    source,
                }
            })?;
            let end = locator
                .locate_from(grid, window.end, start)
                .map_err(|source| SpectrumError::WindowIndexNotFound {
                    index,
                    endpoint: "end",
                    source,
                })?;
            Ok(start..end)
        })
        .collect()
}

/// Chi-squared of `model` against `observed` with each window's share.
pub fn chi_squared_breakdown(
    observed: &ObservedSpectrum<'_>,
    model: &[f64],
    windows: &[WavelengthWindow],
    settings: &ModelSettings,
) -> Result<ChiSquaredBreakdown, SpectrumError> {
    validate_observed(observed)?;
    validate_length("model", observed.len(), model.len())?;
    validate_windows(windows)?;
    settings.validate()?;

    let locator = WaveIndexLocator::new(settings.velocity_dispersion_kms);
    let ranges = locate_windows(observed.wavelength, windows, &locator)?;
    breakdown_over_ranges(observed, model, windows, ranges)
}

/// Sums residuals over pixel ranges already located for `windows`.
pub(crate) fn breakdown_over_ranges(
    observed: &ObservedSpectrum<'_>,
    model: &[f64],
    windows: &[WavelengthWindow],
    ranges: Vec<Range<usize>>,
) -> Result<ChiSquaredBreakdown, SpectrumError> {
    let contributions: Vec<WindowContribution> = windows
        .iter()
        .zip(ranges)
        .map(|(window, pixels)| {
            let chi_squared = window_sum(observed, model, pixels.clone());
            debug!(
                start = pixels.start,
                end = pixels.end,
                chi_squared,
                "window chi-squared"
            );
            WindowContribution {
                window: *window,
                pixels,
                chi_squared,
            }
        })
        .collect();

    let total = checked_total(contributions.iter().map(|window| window.chi_squared).sum())?;
    Ok(ChiSquaredBreakdown {
        total,
        windows: contributions,
    })
}

pub fn chi_squared(
    observed: &ObservedSpectrum<'_>,
    model: &[f64],
    windows: &[WavelengthWindow],
    settings: &ModelSettings,
) -> Result<f64, SpectrumError> {
    chi_squared_breakdown(observed, model, windows, settings).map(|breakdown| breakdown.total)
}

fn window_sum(observed: &ObservedSpectrum<'_>, model: &[f64], pixels: Range<usize>) -> f64 {
    pixels
        .map(|pixel| {
            let residual = (observed.flux[pixel] - model[pixel]) / observed.uncertainty[pixel];
            residual * residual
        })
        .sum()
}

fn checked_total(total: f64) -> Result<f64, SpectrumError> {
    if total.is_nan() || total < 0.0 {
        return Err(SpectrumError::ImpossibleChiSquared { value: total });
    }
    Ok(total)
}
