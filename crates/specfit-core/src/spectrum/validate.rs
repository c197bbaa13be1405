use super::SpectrumError;
use crate::common::constants::MIN_CONTROL_POINTS;
use crate::domain::{AbsorptionLine, ContinuumPoint, ObservedSpectrum, WavelengthWindow};

pub(crate) fn validate_grid(grid: &[f64]) -> Result<(), SpectrumError> {
    if grid.is_empty() {
        return Err(SpectrumError::EmptyGrid);
    }

    for (index, value) in grid.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(SpectrumError::NonFiniteWavelength { index, value });
        }

        if index > 0 {
            let previous = grid[index - 1];
            if value <= previous {
                return Err(SpectrumError::NonIncreasingWavelength {
                    index,
                    previous,
                    current: value,
                });
            }
        }
    }

    Ok(())
}

pub(crate) fn validate_length(
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), SpectrumError> {
    if expected != actual {
        return Err(SpectrumError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn validate_observed(observed: &ObservedSpectrum<'_>) -> Result<(), SpectrumError> {
    validate_grid(observed.wavelength)?;
    validate_length("flux", observed.len(), observed.flux.len())?;
    validate_length("uncertainty", observed.len(), observed.uncertainty.len())
}

pub(crate) fn validate_control_points(points: &[ContinuumPoint]) -> Result<(), SpectrumError> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(SpectrumError::TooFewControlPoints {
            minimum: MIN_CONTROL_POINTS,
            actual: points.len(),
        });
    }

    for (index, point) in points.iter().enumerate() {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(SpectrumError::NonFiniteControlPoint {
                index,
                x: point.x,
                y: point.y,
            });
        }

        if index > 0 && point.x <= points[index - 1].x {
            return Err(SpectrumError::NonIncreasingControlPoints {
                index,
                previous: points[index - 1].x,
                current: point.x,
            });
        }
    }

    Ok(())
}

pub(crate) fn validate_lines(lines: &[AbsorptionLine]) -> Result<(), SpectrumError> {
    for (index, line) in lines.iter().enumerate() {
        let checks = [
            ("column_density", line.column_density, f64::NEG_INFINITY, false),
            ("doppler", line.doppler, 0.0, true),
            ("redshift", line.redshift, -1.0, true),
            ("rest_wavelength", line.rest_wavelength, 0.0, true),
            ("gamma", line.gamma, 0.0, false),
            ("oscillator_strength", line.oscillator_strength, 0.0, false),
        ];
        for (field, value, floor, strict) in checks {
            let below = if strict { value <= floor } else { value < floor };
            if !value.is_finite() || below {
                return Err(SpectrumError::InvalidLine {
                    index,
                    field,
                    value,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_windows(windows: &[WavelengthWindow]) -> Result<(), SpectrumError> {
    for (index, window) in windows.iter().enumerate() {
        if !window.start.is_finite() || !window.end.is_finite() || window.start > window.end {
            return Err(SpectrumError::InvalidWindow {
                index,
                start: window.start,
                end: window.end,
            });
        }
    }
    Ok(())
}
