use crate::common::constants::{DEFAULT_VELOCITY_DISPERSION_KMS, SPEED_OF_LIGHT_KMS};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LocatorError {
    #[error(
        "no grid pixel within {tolerance:.6e} of wavelength {wavelength} (searched from index {start} of {len})"
    )]
    IndexNotFound {
        wavelength: f64,
        tolerance: f64,
        start: usize,
        len: usize,
    },
}

/// Finds the grid pixel matching a wavelength to within one resolution
/// element, `target * velocity_dispersion / c`.
///
/// The grid must be strictly increasing; that is checked by callers before
/// any lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveIndexLocator {
    velocity_dispersion_kms: f64,
}

impl Default for WaveIndexLocator {
    fn default() -> Self {
        Self::new(DEFAULT_VELOCITY_DISPERSION_KMS)
    }
}

impl WaveIndexLocator {
    pub const fn new(velocity_dispersion_kms: f64) -> Self {
        Self {
            velocity_dispersion_kms,
        }
    }

    pub const fn velocity_dispersion_kms(&self) -> f64 {
        self.velocity_dispersion_kms
    }

    pub fn tolerance(&self, target: f64) -> f64 {
        target.abs() * self.velocity_dispersion_kms / SPEED_OF_LIGHT_KMS
    }

    /// First index `i` with `|grid[i] - target| <= tolerance(target)`.
    pub fn locate(&self, grid: &[f64], target: f64) -> Result<usize, LocatorError> {
        self.locate_from(grid, target, 0)
    }

    /// Same as [`Self::locate`] but ignores pixels before `start`, for callers
    /// issuing ascending queries.
    ///
    /// Binary search over the sorted grid; returns exactly what a forward scan
    /// from `start` would.
    pub fn locate_from(
        &self,
        grid: &[f64],
        target: f64,
        start: usize,
    ) -> Result<usize, LocatorError> {
        let tolerance = self.tolerance(target);
        let not_found = LocatorError::IndexNotFound {
            wavelength: target,
            tolerance,
            start,
            len: grid.len(),
        };
        let tail = grid.get(start..).ok_or(not_found)?;

        let offset = tail.partition_point(|&wave| wave - target < -tolerance);
        match tail.get(offset) {
            Some(&wave) if (wave - target).abs() <= tolerance => Ok(start + offset),
            _ => Err(not_found),
        }
    }
}

/// Pixels whose wavelength lies in `[lower, upper)`.
pub fn pixel_span(grid: &[f64], lower: f64, upper: f64) -> Range<usize> {
    let start = grid.partition_point(|&wave| wave < lower);
    let end = grid.partition_point(|&wave| wave < upper);
    start..end.max(start)
}
